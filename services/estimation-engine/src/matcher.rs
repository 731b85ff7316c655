//! Material Matcher
//!
//! Resolves free-text extracted materials against the catalog. Every raw
//! material yields exactly one [`MatchResult`]; a miss is data, not an error.

use lumber_models::{
    is_lumber_category, CatalogItem, ConfidenceTier, ContractorSummary, LineTotal, MatchResult,
    MatchStage, MaterialType, MaterialTypeSummary, RawMaterial, QUOTE_NEEDED_CONTRACTOR,
};
use std::sync::Arc;

use crate::catalog::CatalogStore;

/// Keyword rule for bucketing unmatched items into a trade.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub material_type: MaterialType,
    pub keywords: &'static [&'static str],
}

impl ClassificationRule {
    /// A token matches a keyword exactly or as its plural.
    fn matches(&self, tokens: &[String]) -> bool {
        tokens.iter().any(|token| {
            self.keywords.iter().any(|keyword| {
                token == keyword || token.strip_suffix('s').map_or(false, |stem| stem == *keyword)
            })
        })
    }
}

/// Evaluated in order; the first rule with a matching token wins.
pub const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        material_type: MaterialType::Electrical,
        keywords: &[
            "outlet", "switch", "light", "fan", "ceiling", "can", "flush", "led", "smoke",
            "detector", "garage", "pull", "wall", "eaves", "exterior", "disc", "disposal",
        ],
    },
    ClassificationRule {
        material_type: MaterialType::Plumbing,
        keywords: &[
            "pipe", "fitting", "fixture", "faucet", "toilet", "sink", "drain", "valve", "pump",
        ],
    },
    ClassificationRule {
        material_type: MaterialType::Hvac,
        keywords: &[
            "hvac", "duct", "vent", "air", "heating", "cooling", "furnace", "ac", "thermostat",
        ],
    },
    ClassificationRule {
        material_type: MaterialType::Structural,
        keywords: &["beam", "column", "steel", "concrete", "rebar", "anchor", "bolt", "fastener"],
    },
    ClassificationRule {
        material_type: MaterialType::Mechanical,
        keywords: &["motor", "pump", "compressor", "generator", "engine", "transmission"],
    },
];

fn tokens(name: &str) -> Vec<String> {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
        .collect()
}

/// Material-type bucket for a raw material. A recognised category hint wins;
/// otherwise the keyword table decides, defaulting to finishes.
pub fn classify(raw: &RawMaterial) -> MaterialType {
    if let Some(hinted) = raw.category.as_deref().and_then(MaterialType::from_category) {
        return hinted;
    }

    let tokens = tokens(&raw.name);
    CLASSIFICATION_RULES
        .iter()
        .find(|rule| rule.matches(&tokens))
        .map(|rule| rule.material_type)
        .unwrap_or(MaterialType::Finishes)
}

/// Category to candidate-contractor lookup. An empty list means the item
/// needs a quote.
pub trait ContractorDirectory: Send + Sync {
    fn candidates(&self, material_type: MaterialType) -> Vec<String>;
}

const QUALITY_HARDWARE: &str = "Quality Hardware & Lumber";
const BUILDERS_SUPPLY: &str = "Builders Supply Co";
const STRUCTURAL_LUMBER: &str = "Structural Lumber Co";

/// Fixed supplier table used when no external directory is configured.
#[derive(Debug, Clone, Default)]
pub struct StaticContractorDirectory;

impl ContractorDirectory for StaticContractorDirectory {
    fn candidates(&self, material_type: MaterialType) -> Vec<String> {
        let names: [&str; 3] = match material_type {
            MaterialType::Walls => [QUALITY_HARDWARE, BUILDERS_SUPPLY, "Lumber Depot"],
            MaterialType::Joist => [QUALITY_HARDWARE, BUILDERS_SUPPLY, STRUCTURAL_LUMBER],
            MaterialType::Roof => [QUALITY_HARDWARE, "Roofing Supply Co", BUILDERS_SUPPLY],
            MaterialType::CorniceAndDecking => {
                [QUALITY_HARDWARE, "Exterior Supply Co", BUILDERS_SUPPLY]
            }
            MaterialType::PostAndBeams => [QUALITY_HARDWARE, STRUCTURAL_LUMBER, BUILDERS_SUPPLY],
            MaterialType::Electrical => [
                "ElectroMax Electrical Supply",
                QUALITY_HARDWARE,
                "Electrical Depot",
            ],
            MaterialType::Plumbing => ["PlumbRight Supply", QUALITY_HARDWARE, "Plumbing World"],
            MaterialType::Hvac => ["HVAC Supply Co", QUALITY_HARDWARE, "Climate Control Supply"],
            MaterialType::Finishes => [QUALITY_HARDWARE, "Finish Supply Co", "Interior Materials Co"],
            MaterialType::Structural => [QUALITY_HARDWARE, STRUCTURAL_LUMBER, BUILDERS_SUPPLY],
            MaterialType::Mechanical => [QUALITY_HARDWARE, "Mechanical Supply Co", BUILDERS_SUPPLY],
        };
        names.iter().map(|name| name.to_string()).collect()
    }
}

/// Query candidates in resolution order: the name itself, joined variants,
/// then the first and last single tokens.
fn query_candidates(name: &str) -> Vec<(String, MatchStage)> {
    let name = name.trim();
    let words: Vec<&str> = name.split_whitespace().collect();
    let mut candidates = vec![(name.to_string(), MatchStage::Direct)];

    if words.len() > 1 {
        for joiner in ["", "_", "-"] {
            candidates.push((words.join(joiner), MatchStage::Variant));
        }
        for word in [words[0], words[words.len() - 1]] {
            if word.len() > 2 && !candidates.iter().any(|(query, _)| query == word) {
                candidates.push((word.to_string(), MatchStage::Token));
            }
        }
    }

    candidates
}

pub struct MaterialMatcher {
    catalog: Arc<CatalogStore>,
    directory: Arc<dyn ContractorDirectory>,
}

impl MaterialMatcher {
    pub fn new(catalog: Arc<CatalogStore>) -> Self {
        Self {
            catalog,
            directory: Arc::new(StaticContractorDirectory),
        }
    }

    pub fn with_directory(mut self, directory: Arc<dyn ContractorDirectory>) -> Self {
        self.directory = directory;
        self
    }

    fn resolve(&self, raw: &RawMaterial) -> Option<(&CatalogItem, MatchStage)> {
        let lumber_hint = raw.category.as_deref().filter(|c| is_lumber_category(c));

        query_candidates(&raw.name).into_iter().find_map(|(query, stage)| {
            self.catalog
                .search(&query)
                .into_iter()
                .find(|item| lumber_hint.map_or(true, |category| item.in_category(category)))
                .map(|item| (item, stage))
        })
    }

    pub fn match_material(&self, raw: &RawMaterial) -> MatchResult {
        let raw = &raw.clone().with_finite_quantity();
        let resolved = self.resolve(raw);

        let material_type = resolved
            .and_then(|(item, _)| MaterialType::from_category(&item.category))
            .unwrap_or_else(|| classify(raw));
        let available_contractors = self.directory.candidates(material_type);
        let recommended_contractor = available_contractors
            .first()
            .cloned()
            .unwrap_or_else(|| QUOTE_NEEDED_CONTRACTOR.to_string());

        let Some((item, stage)) = resolved else {
            tracing::debug!(material = %raw.name, material_type = %material_type, "No catalog match");
            return MatchResult {
                raw: raw.clone(),
                catalog_item: None,
                quantity: raw.quantity,
                unit_price: None,
                total: LineTotal::QuotationNeeded,
                confidence: ConfidenceTier::None,
                material_type,
                match_stage: None,
                available_contractors,
                recommended_contractor,
                notes: format!("No catalog match; classified as {}", material_type),
            };
        };

        let priced_quantity = raw.priced_quantity().filter(|_| item.unit_price > 0.0);
        let total = priced_quantity
            .map(|quantity| LineTotal::Priced(quantity * item.unit_price))
            .unwrap_or(LineTotal::QuotationNeeded);

        let (confidence, notes) = if !item.is_lumber() {
            (
                ConfidenceTier::NonCatalog,
                format!("Matched {} outside the lumber categories", item.item_id),
            )
        } else if stage == MatchStage::Token {
            (
                ConfidenceTier::Low,
                format!("Matched {} on a single word of the name", item.item_id),
            )
        } else if total.is_priced() {
            (ConfidenceTier::High, format!("Matched {}", item.item_id))
        } else {
            (
                ConfidenceTier::Medium,
                format!("Matched {} but the quantity or price is not usable", item.item_id),
            )
        };

        tracing::debug!(
            material = %raw.name,
            item_id = %item.item_id,
            stage = ?stage,
            confidence = confidence.as_str(),
            "Matched material"
        );

        MatchResult {
            raw: raw.clone(),
            catalog_item: Some(item.clone()),
            quantity: raw.quantity,
            unit_price: Some(item.unit_price),
            total,
            confidence,
            material_type,
            match_stage: Some(stage),
            available_contractors,
            recommended_contractor,
            notes,
        }
    }

    /// Match results in input order.
    pub fn match_all(&self, raws: &[RawMaterial]) -> Vec<MatchResult> {
        raws.iter().map(|raw| self.match_material(raw)).collect()
    }
}

/// Per-contractor roll-up in order of first appearance.
pub fn contractor_summary(results: &[MatchResult]) -> Vec<ContractorSummary> {
    let mut summaries: Vec<ContractorSummary> = Vec::new();
    for result in results {
        let index = match summaries
            .iter()
            .position(|s| s.contractor == result.recommended_contractor)
        {
            Some(index) => index,
            None => {
                summaries.push(ContractorSummary {
                    contractor: result.recommended_contractor.clone(),
                    item_count: 0,
                    priced_total: 0.0,
                    quotation_needed: 0,
                });
                summaries.len() - 1
            }
        };

        let summary = &mut summaries[index];
        summary.item_count += 1;
        match result.total.amount() {
            Some(amount) => summary.priced_total += amount,
            None => summary.quotation_needed += 1,
        }
    }
    summaries
}

/// Per-material-type roll-up in order of first appearance.
pub fn material_summary(results: &[MatchResult]) -> Vec<MaterialTypeSummary> {
    let mut summaries: Vec<MaterialTypeSummary> = Vec::new();
    for result in results {
        let amount = result.total.amount().unwrap_or(0.0);
        match summaries
            .iter_mut()
            .find(|s| s.material_type == result.material_type)
        {
            Some(summary) => {
                summary.item_count += 1;
                summary.priced_total += amount;
            }
            None => summaries.push(MaterialTypeSummary {
                material_type: result.material_type,
                item_count: 1,
                priced_total: amount,
            }),
        }
    }
    summaries
}
