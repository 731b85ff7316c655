//! Accuracy Scorer
//!
//! Scores a project estimate from per-item match confidence plus a boost for
//! contextual completeness. Raw scores are always kept next to the reported,
//! floor-adjusted ones.

use chrono::Utc;
use lumber_models::{
    is_lumber_category, AccuracyMetrics, AccuracyRecord, AccuracySummary, AccuracyTrend, AdjustedScore,
    BoostBreakdown, BuildingDimensions, ConfidenceInterval, ConfidenceLevel, ConfidenceTier,
    EstimateSource, ItemCounts, MatchResult, ProjectEstimate,
};
use lumber_utils::AccuracyConfig;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

pub const BOOST_BUILDING_DIMENSIONS: f64 = 0.15;
pub const BOOST_MATERIAL_COUNT: f64 = 0.10;
pub const BOOST_EXTRACTION_METHOD: f64 = 0.05;
pub const BOOST_MATCH_RATE: f64 = 0.10;
pub const MAX_BOOST: f64 = 0.40;
pub const MATERIAL_COUNT_THRESHOLD: usize = 5;
pub const INTERVAL_MARGIN: f64 = 0.05;
pub const TREND_WINDOW: usize = 5;
pub const TREND_THRESHOLD: f64 = 0.05;
pub const RECENT_WINDOW: usize = 10;
/// Unmatched share above which the notes suggest growing the catalog.
const UNMATCHED_NOTE_RATIO: f64 = 0.30;

pub fn base_weight(tier: ConfidenceTier) -> f64 {
    match tier {
        ConfidenceTier::High => 0.9,
        ConfidenceTier::Medium => 0.7,
        ConfidenceTier::Low => 0.5,
        ConfidenceTier::None => 0.0,
        ConfidenceTier::NonCatalog => 0.3,
    }
}

/// Context carried by an extraction item beyond its name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromotionSignals {
    /// Item dimensions and a category were both supplied.
    pub specified: bool,
    /// The estimate has complete building dimensions.
    pub building_context: bool,
    pub lumber_category: bool,
    pub quantity: bool,
}

impl PromotionSignals {
    pub fn for_result(result: &MatchResult, building: Option<&BuildingDimensions>) -> Self {
        let raw = &result.raw;
        let non_empty = |value: &Option<String>| value.as_deref().map_or(false, |v| !v.trim().is_empty());
        Self {
            specified: non_empty(&raw.dimensions) && non_empty(&raw.category),
            building_context: building.map_or(false, BuildingDimensions::is_complete),
            lumber_category: raw.category.as_deref().map_or(false, is_lumber_category),
            quantity: raw.priced_quantity().is_some(),
        }
    }

    pub fn count(&self) -> usize {
        [self.specified, self.building_context, self.lumber_category, self.quantity]
            .into_iter()
            .filter(|signal| *signal)
            .count()
    }
}

/// Raise a matched tier one step per signal, low to medium to high.
/// `None` and `NonCatalog` are returned unchanged.
pub fn promote_tier(tier: ConfidenceTier, steps: usize) -> ConfidenceTier {
    (0..steps).fold(tier, |tier, _| match tier {
        ConfidenceTier::Low => ConfidenceTier::Medium,
        ConfidenceTier::Medium => ConfidenceTier::High,
        other => other,
    })
}

/// Minimum reported values. Disabled floors are all zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyPolicy {
    /// Apply [`promote_tier`] to extraction items before weighting.
    pub promote_tiers: bool,
    pub enforce_floors: bool,
    pub overall_floor: f64,
    pub category_floor: f64,
    pub quantity_floor: f64,
    pub pricing_floor: f64,
    pub dimension_floor: f64,
}

impl Default for AccuracyPolicy {
    fn default() -> Self {
        Self {
            promote_tiers: true,
            enforce_floors: true,
            overall_floor: 0.90,
            category_floor: 0.85,
            quantity_floor: 0.90,
            pricing_floor: 0.90,
            dimension_floor: 0.95,
        }
    }
}

impl AccuracyPolicy {
    pub fn raw_only() -> Self {
        Self {
            enforce_floors: false,
            ..Self::default()
        }
    }

    pub fn from_config(config: &AccuracyConfig) -> Self {
        let policy = if config.enforce_floors {
            Self::default()
        } else {
            Self::raw_only()
        };
        Self {
            promote_tiers: config.promote_tiers,
            ..policy
        }
    }

    fn floor(&self, floor: f64) -> f64 {
        if self.enforce_floors {
            floor
        } else {
            0.0
        }
    }

    fn adjust(&self, raw: f64, floor: f64) -> AdjustedScore {
        AdjustedScore {
            raw,
            reported: raw.max(self.floor(floor)).min(1.0),
        }
    }

    fn level(&self, accuracy: f64) -> ConfidenceLevel {
        if accuracy >= 0.95 {
            ConfidenceLevel::VeryHigh
        } else if accuracy >= 0.90 || self.enforce_floors {
            ConfidenceLevel::High
        } else if accuracy >= 0.70 {
            ConfidenceLevel::Medium
        } else if accuracy >= 0.50 {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::VeryLow
        }
    }
}

/// One scored unit: a match result, or a takeoff line for dimension estimates.
#[derive(Debug, Clone)]
struct ScoredItem {
    category: String,
    base_tier: ConfidenceTier,
    tier: ConfidenceTier,
    matched: bool,
    priced: bool,
}

fn scored_items(estimate: &ProjectEstimate, promote: bool) -> Vec<ScoredItem> {
    if estimate.source == EstimateSource::Dimensions {
        return estimate
            .categories
            .iter()
            .flat_map(|category| {
                category.lines.iter().map(move |line| ScoredItem {
                    category: category.category.clone(),
                    base_tier: ConfidenceTier::High,
                    tier: ConfidenceTier::High,
                    matched: true,
                    priced: line.unit_price > 0.0,
                })
            })
            .collect();
    }

    estimate
        .match_results
        .iter()
        .map(|result| {
            let steps = if promote {
                PromotionSignals::for_result(result, estimate.building_dimensions.as_ref()).count()
            } else {
                0
            };
            ScoredItem {
                category: result.group_category(),
                base_tier: result.confidence,
                tier: promote_tier(result.confidence, steps),
                matched: result.is_matched(),
                priced: result.is_priced(),
            }
        })
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn percent(value: f64) -> f64 {
    (value * 1000.0).round() / 10.0
}

pub struct AccuracyScorer {
    policy: AccuracyPolicy,
    history: AccuracyHistory,
}

impl Default for AccuracyScorer {
    fn default() -> Self {
        Self::new(AccuracyPolicy::default(), DEFAULT_HISTORY_CAPACITY)
    }
}

impl AccuracyScorer {
    pub fn new(policy: AccuracyPolicy, history_capacity: usize) -> Self {
        Self {
            policy,
            history: AccuracyHistory::new(history_capacity),
        }
    }

    pub fn from_config(config: &AccuracyConfig) -> Self {
        Self::new(AccuracyPolicy::from_config(config), config.history_capacity)
    }

    pub fn policy(&self) -> &AccuracyPolicy {
        &self.policy
    }

    pub fn history(&self) -> &AccuracyHistory {
        &self.history
    }

    fn boost(&self, estimate: &ProjectEstimate, items: &[ScoredItem]) -> BoostBreakdown {
        let dimensions_present = match estimate.source {
            EstimateSource::Dimensions => estimate.area.is_some(),
            EstimateSource::Extraction => estimate
                .building_dimensions
                .as_ref()
                .map_or(false, |d| d.present_count() >= 2),
        };
        let matched = items.iter().filter(|item| item.matched).count();

        let mut boost = BoostBreakdown {
            building_dimensions: if dimensions_present { BOOST_BUILDING_DIMENSIONS } else { 0.0 },
            material_count: if items.len() >= MATERIAL_COUNT_THRESHOLD {
                BOOST_MATERIAL_COUNT
            } else {
                0.0
            },
            extraction_method: if estimate.extraction_method.is_some() {
                BOOST_EXTRACTION_METHOD
            } else {
                0.0
            },
            match_rate: if items.is_empty() {
                0.0
            } else {
                matched as f64 / items.len() as f64 * BOOST_MATCH_RATE
            },
            total: 0.0,
        };
        boost.total = (boost.building_dimensions
            + boost.material_count
            + boost.extraction_method
            + boost.match_rate)
            .min(MAX_BOOST);
        boost
    }

    /// Score an estimate without touching the history.
    pub fn score(&self, estimate: &ProjectEstimate) -> AccuracyMetrics {
        let items = scored_items(estimate, self.policy.promote_tiers);
        let boost = self.boost(estimate, &items);
        let scores: Vec<f64> = items
            .iter()
            .map(|item| (base_weight(item.tier) + boost.total).min(1.0))
            .collect();

        let raw_accuracy = mean(scores.iter().copied()).unwrap_or(0.0);
        let overall = self.policy.adjust(raw_accuracy, self.policy.overall_floor);
        let overall_accuracy = overall.reported;

        let std_dev = mean(scores.iter().map(|s| (s - overall_accuracy).powi(2)))
            .map(f64::sqrt)
            .unwrap_or(0.0);
        let confidence_interval = ConfidenceInterval {
            lower: (self.policy.floor(self.policy.overall_floor) - INTERVAL_MARGIN)
                .max(overall_accuracy - std_dev)
                .max(0.0),
            upper: (overall_accuracy + INTERVAL_MARGIN).min(1.0),
        };

        let mut by_category: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (item, score) in items.iter().zip(&scores) {
            by_category.entry(item.category.clone()).or_default().push(*score);
        }
        let category_accuracy = by_category
            .into_iter()
            .map(|(category, scores)| {
                let raw = mean(scores.into_iter()).unwrap_or(0.0);
                (category, self.policy.adjust(raw, self.policy.category_floor))
            })
            .collect();

        let quantity_raw = mean(items.iter().map(|item| match (item.matched, item.priced) {
            (true, true) => 1.0,
            (true, false) => 0.8,
            (false, _) => 0.6,
        }))
        .unwrap_or(0.0);
        let priced = items.iter().filter(|item| item.priced).count();
        let pricing_raw = if items.is_empty() {
            0.0
        } else {
            priced as f64 / items.len() as f64
        };
        let dimension_raw = match estimate.source {
            EstimateSource::Dimensions => 1.0,
            EstimateSource::Extraction => estimate.building_dimensions.as_ref().map_or(0.0, |d| {
                let present = [d.length_feet, d.width_feet]
                    .iter()
                    .filter(|v| matches!(v, Some(x) if x.is_finite() && *x > 0.0))
                    .count();
                present as f64 / 2.0
            }),
        };

        let item_counts = count_items(&items, |item| item.tier);
        let base_item_counts = count_items(&items, |item| item.base_tier);
        let promoted_items = items.iter().filter(|item| item.tier != item.base_tier).count();
        let floors_applied = self.policy.enforce_floors && overall_accuracy > raw_accuracy;
        let mut validation_notes =
            self.validation_notes(estimate, &item_counts, priced, &boost, &overall);
        if promoted_items > 0 {
            validation_notes.push(format!(
                "{} items promoted by specification context (base tiers: {} high, {} medium, {} low)",
                promoted_items, base_item_counts.high, base_item_counts.medium, base_item_counts.low
            ));
        }

        let metrics = AccuracyMetrics {
            raw_accuracy,
            overall_accuracy,
            confidence_level: self.policy.level(overall_accuracy),
            confidence_interval,
            std_dev,
            category_accuracy,
            quantity_accuracy: self.policy.adjust(quantity_raw, self.policy.quantity_floor),
            pricing_accuracy: self.policy.adjust(pricing_raw, self.policy.pricing_floor),
            dimension_accuracy: self.policy.adjust(dimension_raw, self.policy.dimension_floor),
            boost,
            item_counts,
            base_item_counts,
            promoted_items,
            floors_applied,
            validation_notes,
            calculated_at: Utc::now(),
        };

        tracing::info!(
            project = %estimate.project_name,
            raw = metrics.raw_accuracy,
            reported = metrics.overall_accuracy,
            level = metrics.confidence_level.as_str(),
            items = metrics.item_counts.total,
            promoted = metrics.promoted_items,
            "Scored estimate"
        );
        metrics
    }

    /// Score and append to the rolling history.
    pub fn score_and_record(&self, estimate: &ProjectEstimate) -> AccuracyMetrics {
        let metrics = self.score(estimate);
        self.history.record(AccuracyRecord {
            project_name: estimate.project_name.clone(),
            raw_accuracy: metrics.raw_accuracy,
            overall_accuracy: metrics.overall_accuracy,
            confidence_level: metrics.confidence_level,
            item_count: metrics.item_counts.total,
            recorded_at: metrics.calculated_at,
        });
        metrics
    }

    pub fn summary(&self) -> AccuracySummary {
        self.history.summary()
    }

    fn validation_notes(
        &self,
        estimate: &ProjectEstimate,
        counts: &ItemCounts,
        priced: usize,
        boost: &BoostBreakdown,
        overall: &AdjustedScore,
    ) -> Vec<String> {
        let mut notes = vec![format!(
            "{} of {} items matched to the catalog",
            counts.matched, counts.total
        )];

        let unpriced = counts.total - priced;
        if unpriced > 0 {
            notes.push(format!(
                "{} items require manual quotation or verification",
                unpriced
            ));
        }
        notes.push(format!(
            "Confidence tiers: {} high, {} medium, {} low, {} none, {} non-catalog",
            counts.high, counts.medium, counts.low, counts.none, counts.non_catalog
        ));
        if counts.total > 0 && counts.unmatched as f64 / counts.total as f64 > UNMATCHED_NOTE_RATIO {
            notes.push(
                "More than 30% of items are unmatched; consider expanding the catalog".to_string(),
            );
        }

        if boost.building_dimensions > 0.0 {
            notes.push(format!(
                "Building dimensions available (+{:.2})",
                boost.building_dimensions
            ));
        }
        if boost.material_count > 0.0 {
            notes.push(format!(
                "Material list of {} items (+{:.2})",
                counts.total, boost.material_count
            ));
        }
        if let Some(method) = &estimate.extraction_method {
            notes.push(format!(
                "Extraction method recorded: {} (+{:.2})",
                method, boost.extraction_method
            ));
        }
        if boost.match_rate > 0.0 {
            notes.push(format!(
                "Catalog match rate {}% (+{:.2})",
                percent(counts.matched as f64 / counts.total as f64),
                boost.match_rate
            ));
        }

        if self.policy.enforce_floors && overall.reported > overall.raw {
            notes.push(format!(
                "Reported accuracy raised from {}% to the {}% policy floor",
                percent(overall.raw),
                percent(overall.reported)
            ));
        }
        notes
    }
}

fn count_items(items: &[ScoredItem], tier_of: impl Fn(&ScoredItem) -> ConfidenceTier) -> ItemCounts {
    let mut counts = ItemCounts {
        total: items.len(),
        ..ItemCounts::default()
    };
    for item in items {
        if item.matched {
            counts.matched += 1;
        } else {
            counts.unmatched += 1;
        }
        match tier_of(item) {
            ConfidenceTier::High => counts.high += 1,
            ConfidenceTier::Medium => counts.medium += 1,
            ConfidenceTier::Low => counts.low += 1,
            ConfidenceTier::None => counts.none += 1,
            ConfidenceTier::NonCatalog => counts.non_catalog += 1,
        }
    }
    counts
}

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

#[derive(Debug, Default)]
struct HistoryState {
    records: VecDeque<AccuracyRecord>,
    total: u64,
}

/// Bounded, process-wide record of scored estimates. Appends are serialized
/// through one lock.
#[derive(Debug)]
pub struct AccuracyHistory {
    capacity: usize,
    state: Mutex<HistoryState>,
}

impl AccuracyHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(HistoryState::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HistoryState> {
        // A panic while holding the lock cannot leave the deque half-updated.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record(&self, record: AccuracyRecord) {
        let mut state = self.lock();
        if state.records.len() == self.capacity {
            state.records.pop_front();
        }
        state.records.push_back(record);
        state.total += 1;
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn records(&self) -> Vec<AccuracyRecord> {
        self.lock().records.iter().cloned().collect()
    }

    pub fn summary(&self) -> AccuracySummary {
        let state = self.lock();
        let accuracies: Vec<f64> = state.records.iter().map(|r| r.overall_accuracy).collect();
        let recent: Vec<f64> = accuracies
            .iter()
            .skip(accuracies.len().saturating_sub(RECENT_WINDOW))
            .copied()
            .collect();

        let mut confidence_distribution = BTreeMap::new();
        let skip = state.records.len().saturating_sub(RECENT_WINDOW);
        for record in state.records.iter().skip(skip) {
            *confidence_distribution.entry(record.confidence_level).or_insert(0) += 1;
        }

        AccuracySummary {
            total_estimates: state.total,
            retained_estimates: state.records.len(),
            recent_average: mean(recent.iter().copied()),
            confidence_distribution,
            trend: trend(&recent),
            best_accuracy: accuracies.iter().copied().reduce(f64::max),
            worst_accuracy: accuracies.iter().copied().reduce(f64::min),
            recent_accuracy: recent,
        }
    }
}

/// Mean of the last window against the window before it.
pub fn trend(recent: &[f64]) -> AccuracyTrend {
    if recent.len() < TREND_WINDOW {
        return AccuracyTrend::InsufficientData;
    }
    let split = recent.len() - TREND_WINDOW;
    let previous = &recent[split.saturating_sub(TREND_WINDOW)..split];
    let (Some(last), Some(previous)) = (
        mean(recent[split..].iter().copied()),
        mean(previous.iter().copied()),
    ) else {
        return AccuracyTrend::InsufficientData;
    };

    let delta = last - previous;
    if delta > TREND_THRESHOLD {
        AccuracyTrend::Improving
    } else if delta < -TREND_THRESHOLD {
        AccuracyTrend::Declining
    } else {
        AccuracyTrend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogStore;
    use crate::estimator::{derive_area_spec, QuantityEstimator};
    use crate::matcher::MaterialMatcher;
    use crate::pipeline::assemble_extraction_estimate;
    use lumber_models::RawMaterial;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn extraction_estimate(raws: &[RawMaterial], dims: Option<BuildingDimensions>) -> ProjectEstimate {
        let matcher = MaterialMatcher::new(Arc::new(CatalogStore::with_seed()));
        let results = matcher.match_all(raws);
        assemble_extraction_estimate("Scored", results, dims, None, None)
    }

    fn record(accuracy: f64) -> AccuracyRecord {
        AccuracyRecord {
            project_name: "p".to_string(),
            raw_accuracy: accuracy,
            overall_accuracy: accuracy,
            confidence_level: ConfidenceLevel::High,
            item_count: 1,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_dimension_estimate_scores_as_high_confidence() {
        let estimator = QuantityEstimator::new(Arc::new(CatalogStore::with_seed()));
        let area = derive_area_spec(20.0, 12.0, 8.0).unwrap();
        let estimate = estimator.estimate_project("Shed", &area);

        let metrics = AccuracyScorer::default().score(&estimate);
        assert_eq!(metrics.item_counts.total, estimate.summary.total_line_items);
        assert_eq!(metrics.item_counts.high, metrics.item_counts.total);
        assert_eq!(metrics.raw_accuracy, 1.0);
        assert_eq!(metrics.confidence_level, ConfidenceLevel::VeryHigh);
        assert_eq!(metrics.dimension_accuracy.raw, 1.0);
    }

    #[test]
    fn test_unmatched_items_raise_floor_but_keep_raw() {
        let estimate = extraction_estimate(
            &[
                RawMaterial::new("Unicorn Widget", 1.0, "each"),
                RawMaterial::new("Dragon Scale", 1.0, "each"),
            ],
            None,
        );

        let metrics = AccuracyScorer::default().score(&estimate);
        assert!(metrics.raw_accuracy < 0.1);
        assert_eq!(metrics.overall_accuracy, 0.90);
        assert!(metrics.floors_applied);
        assert_eq!(metrics.confidence_level, ConfidenceLevel::High);
        assert!(metrics.confidence_interval.contains(metrics.overall_accuracy));
        assert!(metrics
            .validation_notes
            .iter()
            .any(|n| n == "2 items require manual quotation or verification"));
        assert!(metrics.validation_notes.iter().any(|n| n.contains("expanding the catalog")));
    }

    #[test]
    fn test_raw_only_policy_reports_computed_values() {
        let estimate = extraction_estimate(&[RawMaterial::new("Unicorn Widget", 1.0, "each")], None);
        let scorer = AccuracyScorer::new(AccuracyPolicy::raw_only(), 10);

        let metrics = scorer.score(&estimate);
        assert_eq!(metrics.overall_accuracy, metrics.raw_accuracy);
        assert!(!metrics.floors_applied);
        assert_eq!(metrics.confidence_level, ConfidenceLevel::VeryLow);
        assert_eq!(metrics.pricing_accuracy.reported, 0.0);
    }

    #[test]
    fn test_boost_breakdown() {
        let raws: Vec<RawMaterial> = (0..5)
            .map(|_| RawMaterial::new("2X4 STUD", 10.0, "each").with_category("Walls"))
            .collect();
        let estimate = extraction_estimate(&raws, Some(BuildingDimensions::new(40.0, 30.0, None)));

        let metrics = AccuracyScorer::default().score(&estimate);
        assert_eq!(metrics.boost.building_dimensions, BOOST_BUILDING_DIMENSIONS);
        assert_eq!(metrics.boost.material_count, BOOST_MATERIAL_COUNT);
        assert_eq!(metrics.boost.extraction_method, 0.0);
        assert!((metrics.boost.match_rate - BOOST_MATCH_RATE).abs() < 1e-12);
        assert!((metrics.boost.total - 0.35).abs() < 1e-12);
        assert_eq!(metrics.raw_accuracy, 1.0);
    }

    #[test]
    fn test_promotion_ladder() {
        assert_eq!(promote_tier(ConfidenceTier::Low, 0), ConfidenceTier::Low);
        assert_eq!(promote_tier(ConfidenceTier::Low, 1), ConfidenceTier::Medium);
        assert_eq!(promote_tier(ConfidenceTier::Low, 4), ConfidenceTier::High);
        assert_eq!(promote_tier(ConfidenceTier::Medium, 1), ConfidenceTier::High);
        assert_eq!(promote_tier(ConfidenceTier::None, 4), ConfidenceTier::None);
        assert_eq!(promote_tier(ConfidenceTier::NonCatalog, 4), ConfidenceTier::NonCatalog);
    }

    fn single_token_match(quantity: f64) -> MatchResult {
        let matcher = MaterialMatcher::new(Arc::new(CatalogStore::with_seed()));
        let result = matcher.match_material(&RawMaterial::new("Redwood lattice OSB", quantity, "sheet"));
        assert_eq!(result.confidence, ConfidenceTier::Low);
        result
    }

    #[test]
    fn test_specified_item_is_promoted_and_base_tier_reported() {
        let mut result = single_token_match(2.0);
        result.raw.category = Some("Walls".to_string());
        result.raw.dimensions = Some("7/16X4X8".to_string());
        let dims = BuildingDimensions::new(40.0, 30.0, None);

        let signals = PromotionSignals::for_result(&result, Some(&dims));
        assert_eq!(signals.count(), 4);

        let estimate = assemble_extraction_estimate("Scored", vec![result], Some(dims), None, None);
        let metrics = AccuracyScorer::default().score(&estimate);
        assert_eq!(metrics.base_item_counts.low, 1);
        assert_eq!(metrics.item_counts.low, 0);
        assert_eq!(metrics.item_counts.high, 1);
        assert_eq!(metrics.promoted_items, 1);
        assert!(metrics
            .validation_notes
            .iter()
            .any(|n| n.starts_with("1 items promoted by specification context")));
    }

    #[test]
    fn test_quantity_alone_promotes_one_step() {
        let estimate = assemble_extraction_estimate("Scored", vec![single_token_match(2.0)], None, None, None);
        let metrics = AccuracyScorer::default().score(&estimate);
        assert_eq!(metrics.item_counts.medium, 1);
        assert_eq!(metrics.base_item_counts.low, 1);

        let estimate = assemble_extraction_estimate("Scored", vec![single_token_match(0.0)], None, None, None);
        let metrics = AccuracyScorer::default().score(&estimate);
        assert_eq!(metrics.item_counts.low, 1);
        assert_eq!(metrics.promoted_items, 0);
    }

    #[test]
    fn test_promotion_can_be_disabled() {
        let estimate = assemble_extraction_estimate("Scored", vec![single_token_match(2.0)], None, None, None);
        let policy = AccuracyPolicy {
            promote_tiers: false,
            ..AccuracyPolicy::default()
        };
        let promoted = AccuracyScorer::default().score(&estimate);
        let metrics = AccuracyScorer::new(policy, 10).score(&estimate);

        assert_eq!(metrics.item_counts, metrics.base_item_counts);
        assert_eq!(metrics.item_counts.low, 1);
        assert_eq!(metrics.promoted_items, 0);
        assert!(metrics.raw_accuracy < promoted.raw_accuracy);

        let config = AccuracyConfig {
            enforce_floors: true,
            promote_tiers: false,
            history_capacity: 5,
        };
        assert_eq!(AccuracyPolicy::from_config(&config), policy);
    }

    #[test]
    fn test_unmatched_items_are_never_promoted() {
        let raws = vec![RawMaterial::new("Unicorn Widget", 3.0, "each")
            .with_category("Walls")
            .with_dimensions("2X4")];
        let estimate = extraction_estimate(&raws, Some(BuildingDimensions::new(40.0, 30.0, None)));

        let metrics = AccuracyScorer::default().score(&estimate);
        assert_eq!(metrics.item_counts.none, 1);
        assert_eq!(metrics.promoted_items, 0);
    }

    #[test]
    fn test_distribution_covers_recent_window_only() {
        let history = AccuracyHistory::new(50);
        for _ in 0..2 {
            history.record(AccuracyRecord {
                confidence_level: ConfidenceLevel::VeryLow,
                ..record(0.3)
            });
        }
        for _ in 0..RECENT_WINDOW {
            history.record(record(0.92));
        }

        let summary = history.summary();
        assert_eq!(summary.retained_estimates, RECENT_WINDOW + 2);
        assert_eq!(summary.confidence_distribution.values().sum::<usize>(), RECENT_WINDOW);
        assert_eq!(summary.confidence_distribution.get(&ConfidenceLevel::High), Some(&RECENT_WINDOW));
        assert!(!summary.confidence_distribution.contains_key(&ConfidenceLevel::VeryLow));
        assert_eq!(summary.worst_accuracy, Some(0.3));
    }

    #[test]
    fn test_history_is_bounded_and_counts_all() {
        let history = AccuracyHistory::new(3);
        for accuracy in [0.5, 0.6, 0.7, 0.8] {
            history.record(record(accuracy));
        }
        let summary = history.summary();
        assert_eq!(summary.total_estimates, 4);
        assert_eq!(summary.retained_estimates, 3);
        assert_eq!(summary.recent_accuracy, vec![0.6, 0.7, 0.8]);
        assert_eq!(summary.best_accuracy, Some(0.8));
        assert_eq!(summary.worst_accuracy, Some(0.6));
        assert_eq!(summary.trend, AccuracyTrend::InsufficientData);
    }

    #[test]
    fn test_trend_windows() {
        assert_eq!(trend(&[0.9; 5]), AccuracyTrend::InsufficientData);
        assert_eq!(trend(&[0.8, 0.8, 0.9, 0.9, 0.9, 0.9, 0.9]), AccuracyTrend::Improving);
        assert_eq!(trend(&[0.99, 0.99, 0.9, 0.9, 0.9, 0.9, 0.9]), AccuracyTrend::Declining);
        assert_eq!(trend(&[0.9; 10]), AccuracyTrend::Stable);
    }

    #[test]
    fn test_concurrent_appends_are_all_recorded() {
        let scorer = Arc::new(AccuracyScorer::default());
        let estimate = extraction_estimate(&[RawMaterial::new("2X4 STUD", 1.0, "each")], None);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let scorer = Arc::clone(&scorer);
                let estimate = estimate.clone();
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        scorer.score_and_record(&estimate);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(scorer.summary().total_estimates, 80);
        assert_eq!(scorer.history().len(), 80);
    }

    proptest! {
        #[test]
        fn prop_reported_accuracy_respects_floor_and_interval(
            names in prop::collection::vec(prop::sample::select(vec![
                "2X4 STUD", "Unicorn Widget", "3 inch Nails", "Redwood lattice OSB", "Ceiling fan",
            ]), 0..12),
            with_dims in any::<bool>(),
        ) {
            let raws: Vec<RawMaterial> = names.iter().map(|n| RawMaterial::new(*n, 2.0, "each")).collect();
            let dims = with_dims.then(|| BuildingDimensions::new(40.0, 30.0, Some(8.0)));
            let metrics = AccuracyScorer::default().score(&extraction_estimate(&raws, dims));

            prop_assert!(metrics.overall_accuracy >= 0.90);
            prop_assert!(metrics.overall_accuracy <= 1.0);
            prop_assert!(metrics.confidence_interval.lower <= metrics.overall_accuracy);
            prop_assert!(metrics.overall_accuracy <= metrics.confidence_interval.upper);
            prop_assert!(metrics.raw_accuracy <= metrics.overall_accuracy);
            for score in metrics.category_accuracy.values() {
                prop_assert!(score.reported >= 0.85);
            }
        }
    }
}
