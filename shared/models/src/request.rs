//! Estimation request models.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::material::{BuildingDimensions, RawMaterial};

/// Wall height assumed when a request does not state one.
pub const DEFAULT_WALL_HEIGHT_FEET: f64 = 8.0;

/// Estimate a building from its dimensions alone.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct DimensionRequest {
    pub length: f64,
    pub width: f64,
    #[serde(default)]
    pub height: Option<f64>,
    #[validate(length(min = 1, max = 200, message = "Project name must be between 1 and 200 characters"))]
    pub project_name: String,
}

impl DimensionRequest {
    pub fn new(project_name: impl Into<String>, length: f64, width: f64) -> Self {
        Self {
            length,
            width,
            height: None,
            project_name: project_name.into(),
        }
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn height_or_default(&self) -> f64 {
        self.height.unwrap_or(DEFAULT_WALL_HEIGHT_FEET)
    }
}

/// Estimate from materials already extracted from a document.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct MaterialsRequest {
    #[validate(length(min = 1, max = 128, message = "Document hash must be between 1 and 128 characters"))]
    pub document_hash: String,
    #[validate(length(min = 1, max = 200))]
    pub project_name: String,
    pub raw_materials: Vec<RawMaterial>,
    #[serde(default)]
    pub building_dimensions: Option<BuildingDimensions>,
    #[serde(default)]
    pub extraction_method: Option<String>,
}

impl MaterialsRequest {
    pub fn new(
        document_hash: impl Into<String>,
        project_name: impl Into<String>,
        raw_materials: Vec<RawMaterial>,
    ) -> Self {
        Self {
            document_hash: document_hash.into(),
            project_name: project_name.into(),
            raw_materials,
            building_dimensions: None,
            extraction_method: None,
        }
    }

    pub fn with_building_dimensions(mut self, dimensions: BuildingDimensions) -> Self {
        self.building_dimensions = Some(dimensions);
        self
    }

    pub fn with_extraction_method(mut self, method: impl Into<String>) -> Self {
        self.extraction_method = Some(method.into());
        self
    }
}
