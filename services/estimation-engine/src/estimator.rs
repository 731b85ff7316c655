//! Quantity Estimator
//!
//! Derives a standards-based lumber takeoff from building dimensions. All
//! functions are pure; the catalog is only read.

use chrono::Utc;
use lumber_models::{
    AreaSpecification, CatalogItem, CategoryEstimate, EstimateSource, EstimateSummary,
    ExtractionStatus, LumberEstimateLine, ProjectEstimate, LUMBER_CATEGORIES,
};
use lumber_utils::{validate_dimensions, EstimatorResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::catalog::CatalogStore;

pub const STUD_SPACING_INCHES: f64 = 16.0;
pub const JOIST_SPACING_INCHES: f64 = 16.0;
pub const RAFTER_SPACING_INCHES: f64 = 24.0;
pub const WASTE_FACTOR: f64 = 1.15;
/// 6:12 roof pitch.
pub const ROOF_PITCH_RATIO: f64 = 0.5;
pub const CORNER_STUDS: u64 = 4;
/// One extra stud per this many feet of wall for openings.
pub const OPENING_ALLOWANCE_FEET: f64 = 8.0;
pub const SHEET_AREA_SQFT: f64 = 32.0;
pub const ROOF_OVERHANG_FACTOR: f64 = 1.10;
pub const SQFT_PER_OPENING_GROUP: f64 = 400.0;
pub const OPENINGS_PER_GROUP: u64 = 3;
pub const HEADER_LENGTH_FEET: f64 = 12.0;
pub const HANGERS_PER_PACK: u64 = 25;

/// `ceil` that ignores float noise just above an integer.
fn ceil_count(value: f64) -> u64 {
    let rounded = value.round();
    if (value - rounded).abs() < 1e-9 {
        rounded.max(0.0) as u64
    } else {
        value.ceil().max(0.0) as u64
    }
}

pub fn derive_area_spec(length: f64, width: f64, height: f64) -> EstimatorResult<AreaSpecification> {
    let (length, width, height) = validate_dimensions(Some(length), Some(width), Some(height))?;
    Ok(AreaSpecification {
        length_feet: length,
        width_feet: width,
        height_feet: height,
        area_sqft: length * width,
        perimeter_feet: 2.0 * (length + width),
    })
}

pub fn studs_needed(perimeter_feet: f64) -> u64 {
    ceil_count(perimeter_feet * 12.0 / STUD_SPACING_INCHES)
        + CORNER_STUDS
        + ceil_count(perimeter_feet / OPENING_ALLOWANCE_FEET)
}

/// Top and bottom plates, in linear feet.
pub fn plates_needed(perimeter_feet: f64) -> f64 {
    perimeter_feet * 2.0
}

pub fn joists_needed(width_feet: f64) -> u64 {
    ceil_count(width_feet * 12.0 / JOIST_SPACING_INCHES) + 1
}

pub fn rafter_length(length_feet: f64) -> f64 {
    (length_feet.powi(2) + (length_feet * ROOF_PITCH_RATIO).powi(2)).sqrt()
}

pub fn rafters_needed(width_feet: f64) -> u64 {
    ceil_count(width_feet * 12.0 / RAFTER_SPACING_INCHES) + 1
}

pub fn wall_sheathing_sheets(perimeter_feet: f64, height_feet: f64) -> u64 {
    ceil_count(perimeter_feet * height_feet / SHEET_AREA_SQFT)
}

pub fn roof_sheathing_sheets(area_sqft: f64) -> u64 {
    ceil_count(area_sqft * ROOF_OVERHANG_FACTOR / SHEET_AREA_SQFT)
}

pub fn openings_needed(area_sqft: f64) -> u64 {
    ceil_count(area_sqft / SQFT_PER_OPENING_GROUP) * OPENINGS_PER_GROUP
}

pub fn stud_size(height_feet: f64) -> &'static str {
    if height_feet <= 10.0 {
        "2X4"
    } else {
        "2X6"
    }
}

pub fn joist_size(span_feet: f64) -> &'static str {
    if span_feet <= 12.0 {
        "2X8"
    } else if span_feet <= 16.0 {
        "2X10"
    } else {
        "2X12"
    }
}

pub fn rafter_size(rafter_length_feet: f64) -> &'static str {
    if rafter_length_feet <= 16.0 {
        "2X6"
    } else if rafter_length_feet <= 24.0 {
        "2X8"
    } else {
        "2X10"
    }
}

/// Whether the dimension string names a piece of the given nominal size,
/// e.g. `2X8X16` for `2X8` but not `2X80`.
fn has_size(item: &CatalogItem, size: &str) -> bool {
    item.dimensions
        .to_uppercase()
        .strip_prefix(size)
        .map_or(false, |rest| rest.starts_with('X'))
}

/// Cheapest candidate whose rated length covers `min_length`; first wins ties.
fn cheapest<'a, F>(catalog: &'a CatalogStore, min_length: f64, predicate: F) -> Option<&'a CatalogItem>
where
    F: Fn(&CatalogItem) -> bool,
{
    catalog
        .all()
        .iter()
        .filter(|item| predicate(item) && item.rated_length() + 1e-9 >= min_length)
        .min_by(|a, b| a.unit_price.total_cmp(&b.unit_price))
}

/// One line of the takeoff: the category it belongs to and either the priced
/// line or a description of the gap.
#[derive(Debug, Clone)]
pub struct Need {
    pub category: &'static str,
    pub outcome: Result<LumberEstimateLine, String>,
}

impl Need {
    fn resolve(
        category: &'static str,
        item: Option<&CatalogItem>,
        quantity: f64,
        coverage: String,
        gap: impl FnOnce() -> String,
    ) -> Self {
        let outcome = match item {
            Some(item) => Ok(LumberEstimateLine::new(item, quantity, coverage)),
            None => Err(gap()),
        };
        Self { category, outcome }
    }
}

fn lines(needs: Vec<Need>) -> Vec<LumberEstimateLine> {
    needs.into_iter().filter_map(|need| need.outcome.ok()).collect()
}

#[derive(Clone)]
pub struct QuantityEstimator {
    catalog: Arc<CatalogStore>,
}

impl QuantityEstimator {
    pub fn new(catalog: Arc<CatalogStore>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn estimate_wall_framing(&self, area: &AreaSpecification) -> Vec<LumberEstimateLine> {
        lines(self.wall_framing_needs(area))
    }

    pub fn estimate_floor_joists(&self, area: &AreaSpecification) -> Vec<LumberEstimateLine> {
        lines(self.floor_joist_needs(area))
    }

    pub fn estimate_roof_rafters(&self, area: &AreaSpecification) -> Vec<LumberEstimateLine> {
        lines(self.roof_rafter_needs(area))
    }

    pub fn estimate_sheathing(&self, area: &AreaSpecification) -> Vec<LumberEstimateLine> {
        lines(self.sheathing_needs(area))
    }

    pub fn estimate_headers(&self, area: &AreaSpecification) -> Vec<LumberEstimateLine> {
        lines(self.header_needs(area))
    }

    fn wall_framing_needs(&self, area: &AreaSpecification) -> Vec<Need> {
        let size = stud_size(area.height_feet);
        let studs = studs_needed(area.perimeter_feet);
        let stud = cheapest(&self.catalog, area.height_feet, |item| {
            item.subcategory.eq_ignore_ascii_case("Studs") && has_size(item, size)
        });

        let plate_feet = plates_needed(area.perimeter_feet);
        let plate = cheapest(&self.catalog, 0.0, |item| {
            item.category.eq_ignore_ascii_case("Walls")
                && item.description.to_uppercase().contains("PLATE")
                && has_size(item, size)
        });

        vec![
            Need::resolve(
                "Walls",
                stud,
                studs as f64,
                format!(
                    "Wall studs at {}\" o.c. for {} lf of wall, incl. corners and openings",
                    STUD_SPACING_INCHES, area.perimeter_feet
                ),
                || format!("No {} stud at least {} ft long", size, area.height_feet),
            ),
            Need::resolve(
                "Walls",
                plate,
                plate_feet,
                format!("Top and bottom plates, {} lf", plate_feet),
                || format!("No {} plate stock", size),
            ),
        ]
    }

    fn floor_joist_needs(&self, area: &AreaSpecification) -> Vec<Need> {
        let span = area.length_feet;
        let size = joist_size(span);
        let joists = joists_needed(area.width_feet);
        let joist = cheapest(&self.catalog, span, |item| {
            item.category.eq_ignore_ascii_case("Joist") && has_size(item, size)
        });

        let packs = ceil_count(joists as f64 / HANGERS_PER_PACK as f64);
        let hanger = cheapest(&self.catalog, 0.0, |item| {
            item.category.eq_ignore_ascii_case("Joist")
                && item.subcategory.eq_ignore_ascii_case("Hardware")
                && item.dimensions.to_uppercase().starts_with("HU")
        });

        vec![
            Need::resolve(
                "Joist",
                joist,
                joists as f64,
                format!(
                    "Floor joists at {}\" o.c. across {} ft, spanning {} ft",
                    JOIST_SPACING_INCHES, area.width_feet, span
                ),
                || format!("No {} joist at least {} ft long", size, span),
            ),
            Need::resolve(
                "Joist",
                hanger,
                packs as f64,
                format!("Joist hangers for {} joists, {} per pack", joists, HANGERS_PER_PACK),
                || "No joist hanger packs".to_string(),
            ),
        ]
    }

    fn roof_rafter_needs(&self, area: &AreaSpecification) -> Vec<Need> {
        let length = rafter_length(area.length_feet);
        let size = rafter_size(length);
        let count = rafters_needed(area.width_feet);
        let rafter = cheapest(&self.catalog, length, |item| {
            item.category.eq_ignore_ascii_case("Roof")
                && item.subcategory.eq_ignore_ascii_case("Rafters")
                && has_size(item, size)
        });

        vec![Need::resolve(
            "Roof",
            rafter,
            count as f64,
            format!(
                "Rafters at {}\" o.c., {:.1} ft at 6:12 pitch",
                RAFTER_SPACING_INCHES, length
            ),
            || format!("No {} rafter at least {:.1} ft long", size, length),
        )]
    }

    fn sheathing_needs(&self, area: &AreaSpecification) -> Vec<Need> {
        let panel = cheapest(&self.catalog, 0.0, |item| {
            item.subcategory.eq_ignore_ascii_case("Sheathing")
                && item.material.eq_ignore_ascii_case("OSB")
                && item.dimensions.to_uppercase().contains("4X8")
        });
        let wall_sheets = wall_sheathing_sheets(area.perimeter_feet, area.height_feet);
        let roof_sheets = roof_sheathing_sheets(area.area_sqft);

        vec![
            Need::resolve(
                "Walls",
                panel,
                wall_sheets as f64,
                format!(
                    "Wall sheathing for {} sqft of wall",
                    area.perimeter_feet * area.height_feet
                ),
                || "No 4x8 OSB sheathing panel".to_string(),
            ),
            Need::resolve(
                "Roof",
                panel,
                roof_sheets as f64,
                format!("Roof sheathing for {} sqft plus 10% overhang", area.area_sqft),
                || "No 4x8 OSB sheathing panel".to_string(),
            ),
        ]
    }

    fn header_needs(&self, area: &AreaSpecification) -> Vec<Need> {
        let openings = openings_needed(area.area_sqft);
        let header = cheapest(&self.catalog, HEADER_LENGTH_FEET, |item| {
            item.subcategory.eq_ignore_ascii_case("LVL Beams")
                && item.material.eq_ignore_ascii_case("LVL")
                && item.dimensions.contains("11-7/8")
        });

        vec![Need::resolve(
            "Walls",
            header,
            openings as f64,
            format!("Headers for {} openings ({} per 400 sqft)", openings, OPENINGS_PER_GROUP),
            || format!("No LVL header at least {} ft long", HEADER_LENGTH_FEET),
        )]
    }

    /// Full standards-based takeoff for one building.
    pub fn estimate_project(&self, project_name: &str, area: &AreaSpecification) -> ProjectEstimate {
        let needs: Vec<Need> = [
            self.wall_framing_needs(area),
            self.header_needs(area),
            self.sheathing_needs(area),
            self.floor_joist_needs(area),
            self.roof_rafter_needs(area),
        ]
        .into_iter()
        .flatten()
        .collect();

        let mut categories: Vec<CategoryEstimate> =
            LUMBER_CATEGORIES.iter().map(|c| CategoryEstimate::new(*c)).collect();
        let mut gaps = Vec::new();

        for need in needs {
            match need.outcome {
                Ok(line) => {
                    if let Some(category) = categories.iter_mut().find(|c| c.category == need.category) {
                        category.push(line);
                    }
                }
                Err(gap) => {
                    tracing::debug!(category = need.category, gap = %gap, "Takeoff gap");
                    gaps.push(format!("{}: {}", need.category, gap));
                }
            }
        }

        let summary = summarize(&categories, Some(area), 0, gaps);
        tracing::info!(
            project = project_name,
            lines = summary.total_line_items,
            gaps = summary.gaps.len(),
            total = summary.total_cost_with_waste,
            "Dimension takeoff complete"
        );

        ProjectEstimate {
            id: Uuid::new_v4(),
            project_name: project_name.to_string(),
            source: EstimateSource::Dimensions,
            area: Some(*area),
            building_dimensions: None,
            extraction_method: None,
            extraction_status: ExtractionStatus::NotApplicable,
            categories,
            match_results: Vec::new(),
            contractor_summary: Vec::new(),
            material_summary: Vec::new(),
            takeoff: None,
            summary,
            notes: Vec::new(),
            generated_at: Utc::now(),
        }
    }
}

/// Summary totals; the grand total is the waste-adjusted sum of line totals.
pub fn summarize(
    categories: &[CategoryEstimate],
    area: Option<&AreaSpecification>,
    quotation_needed: usize,
    gaps: Vec<String>,
) -> EstimateSummary {
    let total_line_items = categories.iter().map(|c| c.lines.len()).sum();
    let without_waste: f64 = categories
        .iter()
        .flat_map(|c| c.lines.iter())
        .map(|line| line.total)
        .sum();
    let with_waste = without_waste * WASTE_FACTOR;

    EstimateSummary {
        total_line_items,
        total_cost_without_waste: without_waste,
        waste_factor: WASTE_FACTOR,
        waste_factor_label: format!("{}%", ((WASTE_FACTOR - 1.0) * 100.0).round()),
        total_cost_with_waste: with_waste,
        cost_per_sqft: area
            .filter(|a| a.area_sqft > 0.0)
            .map(|a| with_waste / a.area_sqft),
        area_sqft: area.map(|a| a.area_sqft),
        perimeter_feet: area.map(|a| a.perimeter_feet),
        dimensions_label: area.map(|a| a.label()),
        quotation_needed,
        gaps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn estimator() -> QuantityEstimator {
        QuantityEstimator::new(Arc::new(CatalogStore::with_seed()))
    }

    #[test]
    fn test_forty_by_thirty_takeoff_counts() {
        let area = derive_area_spec(40.0, 30.0, 8.0).unwrap();
        assert_eq!(area.perimeter_feet, 140.0);
        assert_eq!(area.area_sqft, 1200.0);
        assert_eq!(studs_needed(area.perimeter_feet), 127);
        assert_eq!(joists_needed(area.width_feet), 24);
        assert_eq!(wall_sheathing_sheets(area.perimeter_feet, area.height_feet), 35);
        assert_eq!(roof_sheathing_sheets(area.area_sqft), 42);
        assert_eq!(openings_needed(area.area_sqft), 9);
        assert_eq!(plates_needed(area.perimeter_feet), 280.0);
    }

    #[test]
    fn test_invalid_dimensions_are_rejected() {
        assert!(derive_area_spec(0.0, 30.0, 8.0).is_err());
        assert!(derive_area_spec(40.0, -5.0, 8.0).is_err());
    }

    #[test]
    fn test_size_tiers() {
        assert_eq!(joist_size(12.0), "2X8");
        assert_eq!(joist_size(16.0), "2X10");
        assert_eq!(joist_size(16.5), "2X12");
        assert_eq!(rafter_size(16.0), "2X6");
        assert_eq!(rafter_size(24.0), "2X8");
        assert_eq!(rafter_size(30.0), "2X10");
        assert!((rafter_length(20.0) - 22.360679).abs() < 1e-5);
    }

    #[test]
    fn test_wall_framing_picks_cheapest_covering_stud() {
        let area = derive_area_spec(40.0, 30.0, 8.0).unwrap();
        let lines = estimator().estimate_wall_framing(&area);

        let studs = &lines[0];
        assert_eq!(studs.item_id, "2X4X104-5/8_KD_HF");
        assert_eq!(studs.quantity, 127.0);
        assert!((studs.total - 127.0 * 4.37).abs() < 1e-9);

        let plates = &lines[1];
        assert!(plates.description.contains("PLATE"));
        assert_eq!(plates.quantity, 280.0);
    }

    #[test]
    fn test_tall_walls_use_longer_studs() {
        let area = derive_area_spec(20.0, 20.0, 12.0).unwrap();
        let lines = estimator().estimate_wall_framing(&area);
        assert!(lines[0].dimensions.starts_with("2X6X"));
        assert_eq!(lines[0].item_id, "2X6X12_KD_HFIR");
    }

    #[test]
    fn test_short_span_joists_and_hangers() {
        let area = derive_area_spec(12.0, 20.0, 8.0).unwrap();
        let lines = estimator().estimate_floor_joists(&area);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].dimensions.starts_with("2X8X"));
        assert_eq!(lines[0].item_id, "2X8X14_KD_HFIR");
        assert_eq!(lines[0].quantity, 16.0);
        assert_eq!(lines[1].item_id, "HU412_25");
        assert_eq!(lines[1].quantity, 1.0);
    }

    #[test]
    fn test_missing_size_tier_is_a_gap_not_an_error() {
        // A 40 ft span needs 2x12 joists longer than anything stocked.
        let area = derive_area_spec(40.0, 30.0, 8.0).unwrap();
        let estimate = estimator().estimate_project("Gap House", &area);

        assert!(estimate.summary.gaps.iter().any(|g| g.starts_with("Joist:")));
        assert!(estimate.category("Joist").is_some());
    }

    #[test]
    fn test_sheathing_and_headers() {
        let area = derive_area_spec(40.0, 30.0, 8.0).unwrap();
        let estimator = estimator();

        let sheathing = estimator.estimate_sheathing(&area);
        assert_eq!(sheathing.len(), 2);
        assert_eq!(sheathing[0].quantity, 35.0);
        assert_eq!(sheathing[1].quantity, 42.0);
        assert_eq!(sheathing[0].unit_price, 9.70);

        let headers = estimator.estimate_headers(&area);
        assert_eq!(headers[0].item_id, "LVL_1-3/4X11-7/8X12");
        assert_eq!(headers[0].quantity, 9.0);
    }

    #[test]
    fn test_project_summary() {
        let area = derive_area_spec(20.0, 12.0, 8.0).unwrap();
        let estimate = estimator().estimate_project("Shed", &area);

        assert_eq!(estimate.categories.len(), 5);
        assert_eq!(estimate.summary.waste_factor_label, "15%");
        assert_eq!(estimate.summary.dimensions_label.as_deref(), Some("20' x 12' x 8'"));
        assert!((estimate.total_cost() - estimate.line_total_sum() * WASTE_FACTOR).abs() < 1e-6);
        let per_sqft = estimate.summary.cost_per_sqft.unwrap();
        assert!((per_sqft * 240.0 - estimate.total_cost()).abs() < 1e-6);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_perimeter_and_stud_floor(length in 0.5f64..200.0, width in 0.5f64..200.0) {
            let area = derive_area_spec(length, width, 8.0).unwrap();
            prop_assert!((area.perimeter_feet - 2.0 * (length + width)).abs() < 1e-9);
            let minimum = (area.perimeter_feet * 12.0 / 16.0).ceil() as u64;
            prop_assert!(studs_needed(area.perimeter_feet) >= minimum);
        }

        #[test]
        fn prop_total_is_waste_adjusted_line_sum(
            length in 4.0f64..80.0,
            width in 4.0f64..60.0,
            height in 7.0f64..14.0,
        ) {
            let area = derive_area_spec(length, width, height).unwrap();
            let estimate = estimator().estimate_project("prop", &area);
            let expected = estimate.line_total_sum() * WASTE_FACTOR;
            prop_assert!((estimate.total_cost() - expected).abs() < 1e-6);
            for line in estimate.lines() {
                prop_assert!((line.total - line.quantity * line.unit_price).abs() < 1e-9);
            }
        }
    }
}
