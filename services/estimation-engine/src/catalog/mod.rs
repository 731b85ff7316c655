//! Catalog Store
//!
//! Immutable, in-memory reference data of purchasable items. Built once at
//! startup and shared by reference; concurrent readers need no locking.

mod seed;

use lumber_models::CatalogItem;
use lumber_utils::{validate_model, CatalogConfig, EstimatorError, EstimatorResult, PriceListParser};
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::OnceLock;

pub use seed::seed_items;

/// An expansion rule: a query mentioning `trigger` (or naming one of `terms`)
/// is retried against every term.
#[derive(Debug, Clone, Copy)]
pub struct SynonymRule {
    pub trigger: &'static str,
    pub terms: &'static [&'static str],
}

impl SynonymRule {
    fn applies_to(&self, query: &str) -> bool {
        query.contains(self.trigger) || self.terms.iter().any(|term| *term == query)
    }
}

/// Ordered synonym table; new rules are appended, never special-cased.
pub const SYNONYM_RULES: &[SynonymRule] = &[
    SynonymRule { trigger: "stud", terms: &["stud", "2x4", "2x6", "2x8", "2x10", "2x12"] },
    SynonymRule { trigger: "rafter", terms: &["rafter", "2x6", "2x8", "2x10", "2x12"] },
    SynonymRule { trigger: "joist", terms: &["joist", "2x8", "2x10", "2x12"] },
    SynonymRule { trigger: "plate", terms: &["plate", "top plate", "bottom plate", "2x4"] },
    SynonymRule { trigger: "fascia", terms: &["fascia", "trim"] },
    SynonymRule { trigger: "trim", terms: &["trim", "fascia"] },
    SynonymRule { trigger: "sheathing", terms: &["sheathing", "plywood", "osb", "4x8", "4x10"] },
    SynonymRule { trigger: "plywood", terms: &["plywood", "sheathing", "osb"] },
    SynonymRule { trigger: "shingle", terms: &["shingles", "roof shingles", "asphalt"] },
    SynonymRule { trigger: "flashing", terms: &["flashing", "roof flashing"] },
    SynonymRule { trigger: "nail", terms: &["nails", "nail", "fastener"] },
    SynonymRule { trigger: "screw", terms: &["screws", "screw", "fastener"] },
];

/// Which search stage produced the hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    Literal,
    Synonym,
    DimensionToken,
}

#[derive(Debug, Clone)]
pub struct SearchHits<'a> {
    pub stage: SearchStage,
    pub items: Vec<&'a CatalogItem>,
}

pub struct CatalogStore {
    items: Vec<CatalogItem>,
    index: HashMap<String, usize>,
    synonyms: &'static [SynonymRule],
}

impl CatalogStore {
    /// Catalog with the built-in price list.
    pub fn with_seed() -> Self {
        let items = seed_items();
        let index = items
            .iter()
            .enumerate()
            .map(|(pos, item)| (item.item_id.clone(), pos))
            .collect();
        Self {
            items,
            index,
            synonyms: SYNONYM_RULES,
        }
    }

    /// Build from arbitrary items. Items are validated; a repeated id replaces
    /// the earlier item in place.
    pub fn from_items(items: Vec<CatalogItem>) -> EstimatorResult<Self> {
        if items.is_empty() {
            return Err(EstimatorError::catalog("catalog must contain at least one item"));
        }

        let mut store = Self {
            items: Vec::with_capacity(items.len()),
            index: HashMap::with_capacity(items.len()),
            synonyms: SYNONYM_RULES,
        };

        for item in items {
            validate_model(&item)
                .map_err(|e| EstimatorError::catalog(format!("item {}: {}", item.item_id, e)))?;
            match store.index.get(&item.item_id) {
                Some(&pos) => {
                    tracing::warn!(item_id = %item.item_id, "Duplicate catalog item id, keeping last definition");
                    store.items[pos] = item;
                }
                None => {
                    store.index.insert(item.item_id.clone(), store.items.len());
                    store.items.push(item);
                }
            }
        }

        Ok(store)
    }

    /// Load the configured price list, or the built-in seed when none is set.
    pub fn load(config: &CatalogConfig) -> EstimatorResult<Self> {
        let Some(path) = &config.price_list_path else {
            let store = Self::with_seed();
            tracing::info!(items = store.len(), "Loaded built-in catalog");
            return Ok(store);
        };

        let parsed = PriceListParser::new()
            .parse_file(Path::new(path))
            .map_err(|e| EstimatorError::catalog(format!("{:#}", e)))?;
        for warning in &parsed.warnings {
            tracing::warn!(file = %parsed.filename, "{}", warning);
        }

        let store = Self::from_items(parsed.items)?;
        tracing::info!(file = %path, items = store.len(), "Loaded catalog price list");
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn all(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn get(&self, item_id: &str) -> Option<&CatalogItem> {
        self.index.get(item_id).map(|&pos| &self.items[pos])
    }

    pub fn items_by_category(&self, category: &str) -> Vec<&CatalogItem> {
        self.items
            .iter()
            .filter(|item| item.category.eq_ignore_ascii_case(category))
            .collect()
    }

    pub fn items_by_subcategory(&self, subcategory: &str) -> Vec<&CatalogItem> {
        self.items
            .iter()
            .filter(|item| item.subcategory.eq_ignore_ascii_case(subcategory))
            .collect()
    }

    pub fn categories(&self) -> BTreeSet<&str> {
        self.items.iter().map(|item| item.category.as_str()).collect()
    }

    pub fn subcategories(&self) -> BTreeSet<&str> {
        self.items.iter().map(|item| item.subcategory.as_str()).collect()
    }

    /// Free-text search ordered by relevance; empty when nothing matches.
    pub fn search(&self, query: &str) -> Vec<&CatalogItem> {
        self.search_staged(query)
            .map(|hits| hits.items)
            .unwrap_or_default()
    }

    /// Literal, then synonym-expanded, then dimension-token search; the first
    /// stage with hits wins.
    pub fn search_staged(&self, query: &str) -> Option<SearchHits<'_>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }

        let (stage, mut items) = [
            SearchStage::Literal,
            SearchStage::Synonym,
            SearchStage::DimensionToken,
        ]
        .into_iter()
        .map(|stage| (stage, self.stage_matches(stage, &query)))
        .find(|(_, items)| !items.is_empty())?;

        rank(&query, &mut items);
        tracing::debug!(query = %query, stage = ?stage, hits = items.len(), "Catalog search");
        Some(SearchHits { stage, items })
    }

    fn stage_matches(&self, stage: SearchStage, query: &str) -> Vec<&CatalogItem> {
        match stage {
            SearchStage::Literal => self.literal_matches(query),
            SearchStage::Synonym => self.synonym_matches(query),
            SearchStage::DimensionToken => self.dimension_matches(query),
        }
    }

    fn literal_matches(&self, query: &str) -> Vec<&CatalogItem> {
        self.items
            .iter()
            .filter(|item| {
                [&item.description, &item.material, &item.grade, &item.dimensions]
                    .iter()
                    .any(|field| field.to_lowercase().contains(query))
            })
            .collect()
    }

    fn synonym_matches(&self, query: &str) -> Vec<&CatalogItem> {
        let terms: Vec<&str> = self
            .synonyms
            .iter()
            .filter(|rule| rule.applies_to(query))
            .flat_map(|rule| rule.terms.iter().copied())
            .collect();
        if terms.is_empty() {
            return Vec::new();
        }

        self.items
            .iter()
            .filter(|item| {
                let description = item.description.to_lowercase();
                let dimensions = item.dimensions.to_lowercase();
                let material = item.material.to_lowercase();
                terms.iter().any(|term| {
                    description.contains(term) || dimensions.contains(term) || material.contains(term)
                })
            })
            .collect()
    }

    fn dimension_matches(&self, query: &str) -> Vec<&CatalogItem> {
        let tokens: Vec<String> = dimension_token_regex()
            .find_iter(query)
            .map(|m| normalize_dimension(m.as_str()))
            .filter(|token| !token.is_empty())
            .collect();
        if tokens.is_empty() {
            return Vec::new();
        }

        self.items
            .iter()
            .filter(|item| {
                let dims = normalize_dimension(&item.dimensions);
                // Very short item dimensions like `12` would match any token.
                dims.len() >= 3
                    && tokens
                        .iter()
                        .any(|token| dims.contains(token.as_str()) || token.contains(dims.as_str()))
            })
            .collect()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::with_seed()
    }
}

fn dimension_token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(r"\d+(?:[-/]\d+)*\s*[x×]\s*\d+(?:[-/]\d+)*(?:\s*[x×]\s*\d+(?:[-/]\d+)*)?")
            .expect("valid dimension token regex")
    })
}

/// Lowercase and strip whitespace and separators: `2 X 4-8'` becomes `2x48`.
pub fn normalize_dimension(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '_' | '\'' | '"' | '/'))
        .map(|c| if c == '×' { 'x' } else { c.to_ascii_lowercase() })
        .collect()
}

/// Stable sort: full-query description hits, then any-word hits, then the rest.
fn rank(query: &str, items: &mut [&CatalogItem]) {
    let words: Vec<&str> = query.split_whitespace().collect();
    items.sort_by_key(|item| {
        let description = item.description.to_lowercase();
        if description.contains(query) {
            0
        } else if words.iter().any(|word| description.contains(word)) {
            1
        } else {
            2
        }
    });
}
