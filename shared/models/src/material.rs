//! Extracted material and match result models.
//!
//! Raw materials arrive from the extraction service as free text; the matcher
//! turns each one into exactly one [`MatchResult`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::Validate;

use crate::catalog::{CatalogItem, MaterialType};

/// Marker used in place of a total when no catalog price resolves.
pub const QUOTATION_NEEDED: &str = "quotation needed";

/// Contractor shown when the directory has no candidate for a material type.
pub const QUOTE_NEEDED_CONTRACTOR: &str = "Quote needed";

/// A free-text material line supplied by the extraction service.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct RawMaterial {
    #[serde(alias = "item_name")]
    #[validate(length(min = 1, max = 500, message = "Material name must be between 1 and 500 characters"))]
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

fn default_quantity() -> f64 {
    1.0
}

fn default_unit() -> String {
    "each".to_string()
}

impl RawMaterial {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
            category: None,
            dimensions: None,
            location: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_dimensions(mut self, dimensions: impl Into<String>) -> Self {
        self.dimensions = Some(dimensions.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Replace a NaN or infinite quantity with zero, which is never priced.
    /// Non-finite floats have no JSON form, so they must not reach a cached result.
    pub fn with_finite_quantity(mut self) -> Self {
        if !self.quantity.is_finite() {
            self.quantity = 0.0;
        }
        self
    }

    /// Quantity usable for pricing; non-finite or non-positive values are not.
    pub fn priced_quantity(&self) -> Option<f64> {
        (self.quantity.is_finite() && self.quantity > 0.0).then_some(self.quantity)
    }
}

/// Building dimensions as reported by the extraction service, all optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BuildingDimensions {
    #[serde(default, alias = "length")]
    pub length_feet: Option<f64>,
    #[serde(default, alias = "width")]
    pub width_feet: Option<f64>,
    #[serde(default, alias = "height")]
    pub height_feet: Option<f64>,
}

impl BuildingDimensions {
    pub fn new(length_feet: f64, width_feet: f64, height_feet: Option<f64>) -> Self {
        Self {
            length_feet: Some(length_feet),
            width_feet: Some(width_feet),
            height_feet,
        }
    }

    /// Drop NaN or infinite measurements, keeping the rest.
    pub fn finite_only(self) -> Self {
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
        Self {
            length_feet: finite(self.length_feet),
            width_feet: finite(self.width_feet),
            height_feet: finite(self.height_feet),
        }
    }

    /// Length and width are both present, finite and positive.
    pub fn is_complete(&self) -> bool {
        [self.length_feet, self.width_feet]
            .iter()
            .all(|v| matches!(v, Some(x) if x.is_finite() && *x > 0.0))
    }

    /// Number of the three dimensions that carry a usable value.
    pub fn present_count(&self) -> usize {
        [self.length_feet, self.width_feet, self.height_feet]
            .iter()
            .filter(|v| matches!(v, Some(x) if x.is_finite() && *x > 0.0))
            .count()
    }
}

/// Categorical strength of a match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
    None,
    NonCatalog,
}

impl ConfidenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::None => "none",
            Self::NonCatalog => "non_catalog",
        }
    }
}

/// Which matcher stage produced the catalog hit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    Direct,
    Variant,
    Token,
}

/// Total of a match: a number when priced, otherwise the quotation marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineTotal {
    Priced(f64),
    QuotationNeeded,
}

impl LineTotal {
    pub fn amount(&self) -> Option<f64> {
        match self {
            Self::Priced(amount) => Some(*amount),
            Self::QuotationNeeded => None,
        }
    }

    pub fn is_priced(&self) -> bool {
        matches!(self, Self::Priced(_))
    }
}

impl Serialize for LineTotal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Priced(amount) => serializer.serialize_f64(*amount),
            Self::QuotationNeeded => serializer.serialize_str(QUOTATION_NEEDED),
        }
    }
}

impl<'de> Deserialize<'de> for LineTotal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Amount(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Amount(amount) => Ok(Self::Priced(amount)),
            Repr::Text(text) if text.eq_ignore_ascii_case(QUOTATION_NEEDED) => Ok(Self::QuotationNeeded),
            Repr::Text(text) => Err(serde::de::Error::custom(format!(
                "expected a number or \"{}\", got \"{}\"",
                QUOTATION_NEEDED, text
            ))),
        }
    }
}

/// Outcome of matching one raw material against the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    pub raw: RawMaterial,
    pub catalog_item: Option<CatalogItem>,
    pub quantity: f64,
    pub unit_price: Option<f64>,
    pub total: LineTotal,
    pub confidence: ConfidenceTier,
    pub material_type: MaterialType,
    pub match_stage: Option<MatchStage>,
    pub available_contractors: Vec<String>,
    pub recommended_contractor: String,
    pub notes: String,
}

impl MatchResult {
    pub fn is_matched(&self) -> bool {
        self.catalog_item.is_some()
    }

    pub fn is_priced(&self) -> bool {
        self.total.is_priced()
    }

    /// Category used for grouping: the catalog item's category when matched,
    /// otherwise the material-type bucket.
    pub fn group_category(&self) -> String {
        self.catalog_item
            .as_ref()
            .map(|item| item.category.clone())
            .unwrap_or_else(|| self.material_type.as_str().to_string())
    }
}

/// Per-contractor roll-up of match results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContractorSummary {
    pub contractor: String,
    pub item_count: usize,
    pub priced_total: f64,
    pub quotation_needed: usize,
}

/// Per-material-type roll-up of match results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialTypeSummary {
    pub material_type: MaterialType,
    pub item_count: usize,
    pub priced_total: f64,
}
