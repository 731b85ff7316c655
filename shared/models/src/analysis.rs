//! Scored analysis results and their cached form.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::accuracy::AccuracyMetrics;
use crate::estimate::ProjectEstimate;

/// A project estimate together with its accuracy assessment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub estimate: ProjectEstimate,
    pub metrics: AccuracyMetrics,
}

/// Stored cache record keyed by document content hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    pub key: String,
    pub analysis: AnalysisResult,
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(key: impl Into<String>, analysis: AnalysisResult) -> Self {
        Self {
            key: key.into(),
            analysis,
            cached_at: Utc::now(),
        }
    }

    /// An entry is fresh strictly before `cached_at + ttl`.
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now < self.cached_at + ttl
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.cached_at
    }
}
