//! Accuracy metrics attached to a scored estimate, and the rolling summary
//! reported over recent estimates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryHigh => "very_high",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::VeryLow => "very_low",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// A score before and after the floor policy is applied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AdjustedScore {
    pub raw: f64,
    pub reported: f64,
}

/// Contribution of each contextual signal to the confidence boost.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BoostBreakdown {
    pub building_dimensions: f64,
    pub material_count: f64,
    pub extraction_method: f64,
    pub match_rate: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemCounts {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub none: usize,
    pub non_catalog: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccuracyMetrics {
    /// Mean boosted item score before any floor is applied.
    pub raw_accuracy: f64,
    /// Reported accuracy, floor-adjusted when the policy is enforced.
    pub overall_accuracy: f64,
    pub confidence_level: ConfidenceLevel,
    pub confidence_interval: ConfidenceInterval,
    pub std_dev: f64,
    pub category_accuracy: BTreeMap<String, AdjustedScore>,
    pub quantity_accuracy: AdjustedScore,
    pub pricing_accuracy: AdjustedScore,
    pub dimension_accuracy: AdjustedScore,
    pub boost: BoostBreakdown,
    /// Tier counts after context promotion; these drive the item scores.
    pub item_counts: ItemCounts,
    /// Tier counts straight from the matcher, before promotion.
    pub base_item_counts: ItemCounts,
    pub promoted_items: usize,
    pub floors_applied: bool,
    pub validation_notes: Vec<String>,
    pub calculated_at: DateTime<Utc>,
}

impl AccuracyMetrics {
    pub fn overall_percent(&self) -> f64 {
        (self.overall_accuracy * 1000.0).round() / 10.0
    }
}

/// One entry of the rolling accuracy history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccuracyRecord {
    pub project_name: String,
    pub raw_accuracy: f64,
    pub overall_accuracy: f64,
    pub confidence_level: ConfidenceLevel,
    pub item_count: usize,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyTrend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccuracySummary {
    pub total_estimates: u64,
    pub retained_estimates: usize,
    pub recent_average: Option<f64>,
    pub confidence_distribution: BTreeMap<ConfidenceLevel, usize>,
    pub trend: AccuracyTrend,
    pub best_accuracy: Option<f64>,
    pub worst_accuracy: Option<f64>,
    pub recent_accuracy: Vec<f64>,
}
