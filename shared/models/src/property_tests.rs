//! Property-based tests for the lumber estimator domain models
//!
//! These tests check the arithmetic and freshness invariants the rest of the
//! workspace relies on: line totals, category subtotals, dimension
//! completeness and cache entry expiry.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::{
    AccuracyMetrics, AdjustedScore, AnalysisResult, BoostBreakdown, BuildingDimensions, CacheEntry,
    CatalogItem, CategoryEstimate, ConfidenceInterval, ConfidenceLevel, EstimateSource,
    EstimateSummary, ExtractionStatus, ItemCounts, LineTotal, LumberEstimateLine, ProjectEstimate,
};

prop_compose! {
    fn arb_catalog_item()(
        id in "[A-Z0-9_]{3,20}",
        description in "[A-Z0-9 ]{3,30}",
        unit_price in 0.0f64..1000.0,
        length in proptest::option::of(1.0f64..40.0),
    ) -> CatalogItem {
        CatalogItem {
            item_id: id,
            description,
            category: "Walls".to_string(),
            subcategory: "Studs".to_string(),
            dimensions: "2X4X8".to_string(),
            material: "KD H-FIR".to_string(),
            grade: "STD&BTR".to_string(),
            unit_price,
            unit: "each".to_string(),
            length_feet: length,
            width_inches: None,
            thickness_inches: None,
        }
    }
}

fn sample_analysis() -> AnalysisResult {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    AnalysisResult {
        estimate: ProjectEstimate {
            id: Uuid::nil(),
            project_name: "sample".to_string(),
            source: EstimateSource::Dimensions,
            area: None,
            building_dimensions: None,
            extraction_method: None,
            extraction_status: ExtractionStatus::NotApplicable,
            categories: Vec::new(),
            match_results: Vec::new(),
            contractor_summary: Vec::new(),
            material_summary: Vec::new(),
            takeoff: None,
            summary: EstimateSummary {
                total_line_items: 0,
                total_cost_without_waste: 0.0,
                waste_factor: 1.15,
                waste_factor_label: "15%".to_string(),
                total_cost_with_waste: 0.0,
                cost_per_sqft: None,
                area_sqft: None,
                perimeter_feet: None,
                dimensions_label: None,
                quotation_needed: 0,
                gaps: Vec::new(),
            },
            notes: Vec::new(),
            generated_at: now,
        },
        metrics: AccuracyMetrics {
            raw_accuracy: 0.0,
            overall_accuracy: 0.9,
            confidence_level: ConfidenceLevel::High,
            confidence_interval: ConfidenceInterval { lower: 0.85, upper: 0.95 },
            std_dev: 0.0,
            category_accuracy: BTreeMap::new(),
            quantity_accuracy: AdjustedScore { raw: 0.0, reported: 0.9 },
            pricing_accuracy: AdjustedScore { raw: 0.0, reported: 0.9 },
            dimension_accuracy: AdjustedScore { raw: 0.0, reported: 0.95 },
            boost: BoostBreakdown::default(),
            item_counts: ItemCounts::default(),
            base_item_counts: ItemCounts::default(),
            promoted_items: 0,
            floors_applied: true,
            validation_notes: Vec::new(),
            calculated_at: now,
        },
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every line's total equals quantity times unit price.
    #[test]
    fn prop_line_total_equals_quantity_times_price(
        item in arb_catalog_item(),
        quantity in 0.0f64..10_000.0,
    ) {
        let line = LumberEstimateLine::new(&item, quantity, "coverage");
        prop_assert!((line.total - quantity * item.unit_price).abs() < 1e-9);
        prop_assert_eq!(line.unit_price, item.unit_price);
    }

    /// A category subtotal is the sum of its line totals, in push order.
    #[test]
    fn prop_category_subtotal_is_sum_of_lines(
        items in prop::collection::vec((arb_catalog_item(), 0.0f64..500.0), 0..20),
    ) {
        let mut category = CategoryEstimate::new("Walls");
        for (item, quantity) in &items {
            category.push(LumberEstimateLine::new(item, *quantity, "c"));
        }
        let expected: f64 = category.lines.iter().map(|l| l.total).sum();
        prop_assert!((category.subtotal - expected).abs() < 1e-6);
        prop_assert_eq!(category.lines.len(), items.len());
        for (line, (item, _)) in category.lines.iter().zip(items.iter()) {
            prop_assert_eq!(&line.item_id, &item.item_id);
        }
    }

    /// Dimensions are complete exactly when length and width are positive.
    #[test]
    fn prop_dimension_completeness(length in -50.0f64..50.0, width in -50.0f64..50.0) {
        let dims = BuildingDimensions::new(length, width, None);
        prop_assert_eq!(dims.is_complete(), length > 0.0 && width > 0.0);
    }

    /// A cache entry is never fresh once its TTL has elapsed.
    #[test]
    fn prop_cache_entry_expires_after_ttl(
        ttl_secs in 1i64..200_000,
        elapsed_secs in 0i64..400_000,
    ) {
        let mut entry = CacheEntry::new("abc", sample_analysis());
        entry.cached_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let now = entry.cached_at + Duration::seconds(elapsed_secs);
        let fresh = entry.is_fresh(Duration::seconds(ttl_secs), now);
        prop_assert_eq!(fresh, elapsed_secs < ttl_secs);
    }

    /// Priced totals keep their amount through JSON.
    #[test]
    fn prop_priced_total_keeps_amount(amount in 0.0f64..1_000_000.0) {
        let json = serde_json::to_string(&LineTotal::Priced(amount)).unwrap();
        let back: LineTotal = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back.amount(), Some(amount));
    }
}

#[test]
fn test_cache_entry_serialization_is_lossless() {
    let entry = CacheEntry::new("deadbeef", sample_analysis());
    let json = serde_json::to_string(&entry).unwrap();
    let back: CacheEntry = serde_json::from_str(&json).unwrap();
    assert_eq!(back, entry);
}
