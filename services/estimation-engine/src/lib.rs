//! # Lumber Estimation Engine
//!
//! Turns building dimensions or extracted drawing materials into a priced,
//! categorized lumber bill of materials with an accuracy assessment.
//!
//! ## Components
//!
//! - **CatalogStore**: read-only priced catalog with staged search
//! - **QuantityEstimator**: standards-based takeoff from dimensions
//! - **MaterialMatcher**: resolves free-text materials to catalog items
//! - **AccuracyScorer**: confidence-weighted accuracy with a floor policy
//! - **ExtractionResultCache**: TTL cache with one computation per document
//! - **EstimationPipeline**: wires the above to an extraction service

pub mod cache;
pub mod catalog;
pub mod estimator;
pub mod extraction;
pub mod matcher;
pub mod pipeline;
pub mod scorer;

pub use cache::{document_hash, document_hash_from_path, CacheStats, ExtractionResultCache};
pub use catalog::{CatalogStore, SearchHits, SearchStage};
pub use estimator::QuantityEstimator;
pub use extraction::{DocumentExtractor, ExtractionOutput, RenderedDocument, VlmExtractionClient};
pub use matcher::{ContractorDirectory, MaterialMatcher, StaticContractorDirectory};
pub use pipeline::{EstimateOptions, EstimationPipeline};
pub use scorer::{AccuracyPolicy, AccuracyScorer};
