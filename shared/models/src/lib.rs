//! # Lumber Estimator Domain Models
//!
//! Typed data model shared by the estimation engine, the persistence layer and
//! the utilities crate. All models implement serde serialization; request and
//! catalog models are validated with the validator crate.
//!
//! ## Key Models
//!
//! - **CatalogItem**: a purchasable, priced material with fixed specifications
//! - **AreaSpecification**: floor area, perimeter and height derived for a takeoff
//! - **LumberEstimateLine**: catalog item, quantity and computed total
//! - **RawMaterial** / **MatchResult**: extracted free-text material and its catalog resolution
//! - **ProjectEstimate**: categorized lines, match results and summary totals
//! - **AccuracyMetrics**: raw and floor-adjusted accuracy with a confidence interval
//! - **CacheEntry**: a scored analysis keyed by document content hash

pub mod accuracy;
pub mod analysis;
pub mod catalog;
pub mod estimate;
pub mod material;
pub mod request;

#[cfg(test)]
pub mod property_tests;

pub use accuracy::*;
pub use analysis::*;
pub use catalog::*;
pub use estimate::*;
pub use material::*;
pub use request::*;
