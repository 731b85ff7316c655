//! Catalog domain models for the lumber estimator.
//!
//! This module defines the purchasable catalog item and the material-type
//! buckets used to group catalog lookups and contractor routing.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// The five structural-lumber categories carried by the catalog.
pub const LUMBER_CATEGORIES: [&str; 5] = [
    "Walls",
    "Joist",
    "Roof",
    "Cornice and Decking",
    "Post & Beams",
];

/// A single purchasable, priced material with fixed specifications.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct CatalogItem {
    #[validate(length(min = 1, max = 100, message = "Item id must be between 1 and 100 characters"))]
    pub item_id: String,
    #[validate(length(min = 1, max = 500, message = "Description must be between 1 and 500 characters"))]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(max = 100))]
    pub subcategory: String,
    #[validate(length(max = 100))]
    pub dimensions: String,
    #[validate(length(max = 100))]
    pub material: String,
    #[validate(length(max = 100))]
    pub grade: String,
    #[validate(range(min = 0.0, message = "Unit price must not be negative"))]
    pub unit_price: f64,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    pub length_feet: Option<f64>,
    pub width_inches: Option<f64>,
    pub thickness_inches: Option<f64>,
}

impl CatalogItem {
    /// Rated length used when checking whether a piece covers a required run.
    pub fn rated_length(&self) -> f64 {
        self.length_feet.unwrap_or(0.0)
    }

    /// True when the item belongs to one of the structural-lumber categories.
    pub fn is_lumber(&self) -> bool {
        is_lumber_category(&self.category)
    }

    /// True when `category` names this item's category or subcategory.
    pub fn in_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category) || self.subcategory.eq_ignore_ascii_case(category)
    }
}

pub fn is_lumber_category(category: &str) -> bool {
    LUMBER_CATEGORIES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(category.trim()))
}

/// Coarse material-type bucket; the lumber categories plus the trade buckets
/// unmatched items are classified into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MaterialType {
    #[serde(rename = "Walls")]
    Walls,
    #[serde(rename = "Joist")]
    Joist,
    #[serde(rename = "Roof")]
    Roof,
    #[serde(rename = "Cornice and Decking")]
    CorniceAndDecking,
    #[serde(rename = "Post & Beams")]
    PostAndBeams,
    #[serde(rename = "electrical")]
    Electrical,
    #[serde(rename = "plumbing")]
    Plumbing,
    #[serde(rename = "hvac")]
    Hvac,
    #[serde(rename = "structural")]
    Structural,
    #[serde(rename = "mechanical")]
    Mechanical,
    #[serde(rename = "finishes")]
    Finishes,
}

impl MaterialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Walls => "Walls",
            Self::Joist => "Joist",
            Self::Roof => "Roof",
            Self::CorniceAndDecking => "Cornice and Decking",
            Self::PostAndBeams => "Post & Beams",
            Self::Electrical => "electrical",
            Self::Plumbing => "plumbing",
            Self::Hvac => "hvac",
            Self::Structural => "structural",
            Self::Mechanical => "mechanical",
            Self::Finishes => "finishes",
        }
    }

    /// Parse a category hint, accepting lumber category names and trade buckets
    /// in any case.
    pub fn from_category(category: &str) -> Option<Self> {
        let normalized = category.trim().to_lowercase();
        let material_type = match normalized.as_str() {
            "walls" => Self::Walls,
            "joist" | "joists" => Self::Joist,
            "roof" => Self::Roof,
            "cornice and decking" => Self::CorniceAndDecking,
            "post & beams" | "post and beams" => Self::PostAndBeams,
            "electrical" => Self::Electrical,
            "plumbing" => Self::Plumbing,
            "hvac" => Self::Hvac,
            "structural" => Self::Structural,
            "mechanical" => Self::Mechanical,
            "finishes" => Self::Finishes,
            _ => return None,
        };
        Some(material_type)
    }

    pub fn is_lumber(&self) -> bool {
        matches!(
            self,
            Self::Walls | Self::Joist | Self::Roof | Self::CorniceAndDecking | Self::PostAndBeams
        )
    }
}

impl std::fmt::Display for MaterialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
