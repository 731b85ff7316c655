//! Estimate models: area takeoff input, priced lines and the assembled
//! project estimate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::CatalogItem;
use crate::material::{BuildingDimensions, ContractorSummary, MatchResult, MaterialTypeSummary};

/// Floor area, perimeter and wall height derived from building dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AreaSpecification {
    pub length_feet: f64,
    pub width_feet: f64,
    pub height_feet: f64,
    pub area_sqft: f64,
    pub perimeter_feet: f64,
}

impl AreaSpecification {
    /// Human-readable label, e.g. `40' x 30' x 8'`.
    pub fn label(&self) -> String {
        format!(
            "{}' x {}' x {}'",
            trim_number(self.length_feet),
            trim_number(self.width_feet),
            trim_number(self.height_feet)
        )
    }
}

fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// One catalog item with the quantity needed and its computed total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LumberEstimateLine {
    pub item_id: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub dimensions: String,
    pub material: String,
    pub grade: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
    pub total: f64,
    pub coverage: String,
}

impl LumberEstimateLine {
    pub fn new(item: &CatalogItem, quantity: f64, coverage: impl Into<String>) -> Self {
        Self {
            item_id: item.item_id.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            subcategory: item.subcategory.clone(),
            dimensions: item.dimensions.clone(),
            material: item.material.clone(),
            grade: item.grade.clone(),
            quantity,
            unit: item.unit.clone(),
            unit_price: item.unit_price,
            total: quantity * item.unit_price,
            coverage: coverage.into(),
        }
    }
}

/// Lines of one category, in derivation order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryEstimate {
    pub category: String,
    pub lines: Vec<LumberEstimateLine>,
    pub subtotal: f64,
}

impl CategoryEstimate {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            lines: Vec::new(),
            subtotal: 0.0,
        }
    }

    pub fn push(&mut self, line: LumberEstimateLine) {
        self.subtotal += line.total;
        self.lines.push(line);
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EstimateSource {
    Dimensions,
    Extraction,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    NotApplicable,
    Complete,
    Partial,
}

/// Summary totals for a project estimate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstimateSummary {
    pub total_line_items: usize,
    pub total_cost_without_waste: f64,
    pub waste_factor: f64,
    pub waste_factor_label: String,
    pub total_cost_with_waste: f64,
    pub cost_per_sqft: Option<f64>,
    pub area_sqft: Option<f64>,
    pub perimeter_feet: Option<f64>,
    pub dimensions_label: Option<String>,
    pub quotation_needed: usize,
    pub gaps: Vec<String>,
}

/// Priced, categorized bill of materials for one estimation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectEstimate {
    pub id: Uuid,
    pub project_name: String,
    pub source: EstimateSource,
    pub area: Option<AreaSpecification>,
    pub building_dimensions: Option<BuildingDimensions>,
    pub extraction_method: Option<String>,
    pub extraction_status: ExtractionStatus,
    pub categories: Vec<CategoryEstimate>,
    pub match_results: Vec<MatchResult>,
    pub contractor_summary: Vec<ContractorSummary>,
    pub material_summary: Vec<MaterialTypeSummary>,
    /// Standards-based takeoff derived from complete building dimensions.
    pub takeoff: Option<Box<ProjectEstimate>>,
    pub summary: EstimateSummary,
    pub notes: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl ProjectEstimate {
    pub fn lines(&self) -> impl Iterator<Item = &LumberEstimateLine> {
        self.categories.iter().flat_map(|c| c.lines.iter())
    }

    pub fn line_total_sum(&self) -> f64 {
        self.lines().map(|line| line.total).sum()
    }

    pub fn total_cost(&self) -> f64 {
        self.summary.total_cost_with_waste
    }

    pub fn category(&self, name: &str) -> Option<&CategoryEstimate> {
        self.categories.iter().find(|c| c.category == name)
    }

    pub fn total_area_sqft(&self) -> Option<f64> {
        self.area.map(|a| a.area_sqft)
    }

    pub fn is_incomplete(&self) -> bool {
        self.extraction_status == ExtractionStatus::Partial
    }
}
