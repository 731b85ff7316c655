//! Estimation pipeline
//!
//! Wires the catalog, estimator, matcher, scorer, cache and extraction client
//! together. Components are constructed once and shared by reference.

use anyhow::{Context, Result};
use chrono::Utc;
use lumber_database::{initialize_store, StoreConfig};
use lumber_models::{
    AccuracySummary, AnalysisResult, BuildingDimensions, CategoryEstimate, DimensionRequest,
    EstimateSource, ExtractionStatus, LumberEstimateLine, MatchResult, MaterialsRequest,
    ProjectEstimate, LUMBER_CATEGORIES,
};
use lumber_utils::{
    log_error, validate_building_dimensions, validate_dimension_request, validate_document_hash,
    validate_model, AppConfig, CacheBackend, EstimatorError, EstimatorResult,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::cache::{document_hash, ExtractionResultCache};
use crate::catalog::CatalogStore;
use crate::estimator::{derive_area_spec, summarize, QuantityEstimator};
use crate::extraction::{DocumentExtractor, ExtractionOutput, RenderedDocument, VlmExtractionClient};
use crate::matcher::{contractor_summary, material_summary, ContractorDirectory, MaterialMatcher};
use crate::scorer::AccuracyScorer;

pub const DEFAULT_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(120);

/// Per-request knobs for document estimates.
#[derive(Debug, Clone, Default)]
pub struct EstimateOptions {
    /// Overrides the pipeline's extraction timeout.
    pub timeout: Option<Duration>,
    pub cancel: CancellationToken,
    /// Drop any cached analysis for the document first.
    pub force_fresh: bool,
}

impl EstimateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn force_fresh(mut self) -> Self {
        self.force_fresh = true;
        self
    }
}

/// Build the estimate for matched materials. Priced matches become lines
/// grouped by catalog category, lumber categories first; the standards
/// takeoff, when present, is attached rather than added to the totals.
pub fn assemble_extraction_estimate(
    project_name: &str,
    match_results: Vec<MatchResult>,
    building_dimensions: Option<BuildingDimensions>,
    extraction_method: Option<String>,
    takeoff: Option<ProjectEstimate>,
) -> ProjectEstimate {
    let mut categories: Vec<CategoryEstimate> = Vec::new();
    for result in &match_results {
        let Some(item) = result.catalog_item.as_ref().filter(|_| result.is_priced()) else {
            continue;
        };
        let coverage = format!(
            "{} ({})",
            result.raw.name,
            result.raw.location.as_deref().unwrap_or("extracted takeoff")
        );
        let line = LumberEstimateLine::new(item, result.quantity, coverage);
        match categories.iter_mut().find(|c| c.category == item.category) {
            Some(category) => category.push(line),
            None => {
                let mut category = CategoryEstimate::new(item.category.clone());
                category.push(line);
                categories.push(category);
            }
        }
    }
    categories.sort_by_key(|c| {
        LUMBER_CATEGORIES
            .iter()
            .position(|lumber| *lumber == c.category)
            .unwrap_or(LUMBER_CATEGORIES.len())
    });

    let quotation_needed = match_results.iter().filter(|r| !r.is_priced()).count();
    let area = takeoff.as_ref().and_then(|t| t.area);
    let mut notes = Vec::new();
    match (&takeoff, &building_dimensions) {
        (Some(takeoff), _) => notes.push(format!(
            "Standards takeoff for {} attached separately, total ${:.2}",
            takeoff.summary.dimensions_label.as_deref().unwrap_or("the building"),
            takeoff.total_cost()
        )),
        (None, Some(_)) => notes.push("Building dimensions incomplete; no standards takeoff".to_string()),
        (None, None) => {}
    }

    ProjectEstimate {
        id: Uuid::new_v4(),
        project_name: project_name.to_string(),
        source: EstimateSource::Extraction,
        area,
        contractor_summary: contractor_summary(&match_results),
        material_summary: material_summary(&match_results),
        summary: summarize(&categories, area.as_ref(), quotation_needed, Vec::new()),
        building_dimensions,
        extraction_method,
        extraction_status: ExtractionStatus::Complete,
        categories,
        match_results,
        takeoff: takeoff.map(Box::new),
        notes,
        generated_at: Utc::now(),
    }
}

/// The pure part of an extraction-based estimate: match, take off, score.
#[derive(Clone)]
struct Analyzer {
    estimator: QuantityEstimator,
    matcher: Arc<MaterialMatcher>,
    scorer: Arc<AccuracyScorer>,
}

impl Analyzer {
    fn analyze(&self, project_name: &str, output: ExtractionOutput) -> EstimatorResult<AnalysisResult> {
        let match_results = self.matcher.match_all(&output.materials);
        let building_dimensions = output.building_dimensions.map(BuildingDimensions::finite_only);

        let takeoff = match &building_dimensions {
            Some(dims) if dims.is_complete() => {
                let (length, width, height) = validate_building_dimensions(dims)?;
                let area = derive_area_spec(length, width, height)?;
                Some(self.estimator.estimate_project(project_name, &area))
            }
            _ => None,
        };

        let mut estimate = assemble_extraction_estimate(
            project_name,
            match_results,
            building_dimensions,
            output.extraction_method,
            takeoff,
        );

        if output.complete {
            let metrics = self.scorer.score_and_record(&estimate);
            return Ok(AnalysisResult { estimate, metrics });
        }

        estimate.extraction_status = ExtractionStatus::Partial;
        estimate.notes.extend(output.warnings.iter().cloned());
        let metrics = self.scorer.score(&estimate);
        Err(EstimatorError::partial_extraction(
            format!("extraction incomplete: {}", output.warnings.join("; ")),
            AnalysisResult { estimate, metrics },
        ))
    }
}

pub struct EstimationPipeline {
    catalog: Arc<CatalogStore>,
    analyzer: Analyzer,
    cache: ExtractionResultCache,
    extractor: Arc<dyn DocumentExtractor>,
    extraction_timeout: Duration,
}

impl EstimationPipeline {
    pub fn new(
        catalog: Arc<CatalogStore>,
        cache: ExtractionResultCache,
        extractor: Arc<dyn DocumentExtractor>,
    ) -> Self {
        Self {
            analyzer: Analyzer {
                estimator: QuantityEstimator::new(Arc::clone(&catalog)),
                matcher: Arc::new(MaterialMatcher::new(Arc::clone(&catalog))),
                scorer: Arc::new(AccuracyScorer::default()),
            },
            catalog,
            cache,
            extractor,
            extraction_timeout: DEFAULT_EXTRACTION_TIMEOUT,
        }
    }

    pub fn with_scorer(mut self, scorer: AccuracyScorer) -> Self {
        self.analyzer.scorer = Arc::new(scorer);
        self
    }

    pub fn with_directory(mut self, directory: Arc<dyn ContractorDirectory>) -> Self {
        self.analyzer.matcher =
            Arc::new(MaterialMatcher::new(Arc::clone(&self.catalog)).with_directory(directory));
        self
    }

    pub fn with_extraction_timeout(mut self, timeout: Duration) -> Self {
        self.extraction_timeout = timeout;
        self
    }

    /// Build every component from configuration.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let catalog = Arc::new(CatalogStore::load(&config.catalog).context("Failed to load catalog")?);

        let store = initialize_store(&StoreConfig {
            redis_url: (config.cache.backend == CacheBackend::Redis).then(|| config.cache.redis_url.clone()),
            key_prefix: config.cache.key_prefix.clone(),
            max_entries: config.cache.max_entries,
        })
        .await
        .context("Failed to initialize cache store")?;
        let cache = ExtractionResultCache::new(store)
            .with_ttl(Duration::from_secs(config.cache.ttl_seconds()));

        let extractor = VlmExtractionClient::new(&config.extraction)
            .context("Failed to build extraction client")?;

        tracing::info!(
            catalog_items = catalog.len(),
            cache_backend = cache.backend_name(),
            ttl_hours = config.cache.ttl_hours,
            floors = config.accuracy.enforce_floors,
            promote_tiers = config.accuracy.promote_tiers,
            "Estimation pipeline ready"
        );

        Ok(Self::new(catalog, cache, Arc::new(extractor))
            .with_scorer(AccuracyScorer::from_config(&config.accuracy))
            .with_extraction_timeout(Duration::from_secs(config.extraction.timeout_seconds)))
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn estimator(&self) -> &QuantityEstimator {
        &self.analyzer.estimator
    }

    pub fn matcher(&self) -> &MaterialMatcher {
        &self.analyzer.matcher
    }

    pub fn scorer(&self) -> &AccuracyScorer {
        &self.analyzer.scorer
    }

    pub fn cache(&self) -> &ExtractionResultCache {
        &self.cache
    }

    /// Standards takeoff from dimensions, scored and recorded. Not cached.
    pub fn estimate_from_dimensions(&self, request: &DimensionRequest) -> EstimatorResult<AnalysisResult> {
        let (length, width, height) = validate_dimension_request(request)?;
        let area = derive_area_spec(length, width, height)?;
        let estimate = self.analyzer.estimator.estimate_project(&request.project_name, &area);
        let metrics = self.analyzer.scorer.score_and_record(&estimate);
        Ok(AnalysisResult { estimate, metrics })
    }

    /// Estimate from materials already extracted, cached under the caller's
    /// document hash.
    pub async fn estimate_from_materials(
        &self,
        request: MaterialsRequest,
        options: EstimateOptions,
    ) -> EstimatorResult<Arc<AnalysisResult>> {
        validate_model(&request)?;
        validate_document_hash(&request.document_hash)?;
        for raw in &request.raw_materials {
            validate_model(raw)?;
        }
        if options.force_fresh {
            self.cache.invalidate(&request.document_hash).await?;
        }

        let analyzer = self.analyzer.clone();
        let key = request.document_hash.clone();
        let output = ExtractionOutput {
            building_dimensions: request.building_dimensions,
            materials: request.raw_materials,
            extraction_method: request.extraction_method,
            complete: true,
            warnings: Vec::new(),
        };
        let project_name = request.project_name;

        self.cache
            .get_or_compute_with_cancel(&key, &options.cancel, move || async move {
                analyzer.analyze(&project_name, output)
            })
            .await
    }

    /// Full document flow: hash, cache, extraction (bounded by the timeout),
    /// matching, takeoff and scoring. Failures and partial results are never
    /// cached.
    pub async fn estimate_from_document(
        &self,
        project_name: &str,
        document: RenderedDocument,
        options: EstimateOptions,
    ) -> EstimatorResult<Arc<AnalysisResult>> {
        let key = document_hash(&document.content_bytes());
        if options.force_fresh {
            self.cache.invalidate(&key).await?;
        }

        let analyzer = self.analyzer.clone();
        let extractor = Arc::clone(&self.extractor);
        let timeout = options.timeout.unwrap_or(self.extraction_timeout);
        let project_name = project_name.to_string();

        let result = self
            .cache
            .get_or_compute_with_cancel(&key, &options.cancel, move || async move {
                tracing::info!(document = %document.name, pages = document.pages.len(), "Calling extraction service");
                let output = match tokio::time::timeout(timeout, extractor.extract(&document)).await {
                    Ok(output) => output?,
                    Err(_) => {
                        return Err(EstimatorError::ExtractionTimeout {
                            seconds: timeout.as_secs().max(1),
                        })
                    }
                };
                analyzer.analyze(&project_name, output)
            })
            .await;

        if let Err(error) = &result {
            log_error!(error, "Document estimate failed", key = %key, code = error.error_code());
        }
        result
    }

    pub fn accuracy_summary(&self) -> AccuracySummary {
        self.analyzer.scorer.summary()
    }

    pub async fn invalidate(&self, document_hash: &str) -> EstimatorResult<()> {
        self.cache.invalidate(document_hash).await
    }

    pub async fn clear_cache(&self) -> EstimatorResult<usize> {
        self.cache.clear().await
    }
}
