//! Extraction service boundary
//!
//! The engine hands a rendered document to a [`DocumentExtractor`] and gets
//! back building dimensions plus free-text materials. [`VlmExtractionClient`]
//! implements it against an OpenAI-compatible vision chat endpoint.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use lumber_models::{BuildingDimensions, RawMaterial};
use lumber_utils::{EstimatorError, EstimatorResult, ExtractionConfig};
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;
use std::time::Duration;

pub const AI_EXTRACTION_METHOD: &str = "AI-powered PDF analysis";

/// A document already rendered to page images (PNG bytes, one per page).
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub name: String,
    pub pages: Vec<Vec<u8>>,
}

impl RenderedDocument {
    pub fn new(name: impl Into<String>, pages: Vec<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            pages,
        }
    }

    /// Pages in order, each prefixed with its length so page boundaries are
    /// part of the content hash.
    pub fn content_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pages.iter().map(|page| page.len() + 8).sum());
        for page in &self.pages {
            bytes.extend_from_slice(&(page.len() as u64).to_le_bytes());
            bytes.extend_from_slice(page);
        }
        bytes
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExtractionOutput {
    pub building_dimensions: Option<BuildingDimensions>,
    pub materials: Vec<RawMaterial>,
    pub extraction_method: Option<String>,
    /// False when any page came back malformed.
    pub complete: bool,
    pub warnings: Vec<String>,
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, document: &RenderedDocument) -> EstimatorResult<ExtractionOutput>;
}

/// Per-page reply shape requested from the model.
#[derive(Debug, Default, Deserialize)]
struct PageExtraction {
    #[serde(default)]
    building_dimensions: Option<PageDimensions>,
    #[serde(default)]
    lumber_materials: Vec<PageMaterial>,
    #[serde(default)]
    other_materials: Vec<PageMaterial>,
}

#[derive(Debug, Default, Deserialize)]
struct PageDimensions {
    #[serde(default)]
    length: Value,
    #[serde(default)]
    width: Value,
    #[serde(default)]
    height: Value,
}

impl PageDimensions {
    fn into_dimensions(self) -> BuildingDimensions {
        BuildingDimensions {
            length_feet: lenient_number(&self.length),
            width_feet: lenient_number(&self.width),
            height_feet: lenient_number(&self.height),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PageMaterial {
    #[serde(alias = "name")]
    item_name: String,
    #[serde(default)]
    quantity: Value,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    dimensions: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

impl PageMaterial {
    fn into_raw(self) -> RawMaterial {
        let quantity = match &self.quantity {
            Value::Null => 1.0,
            other => lenient_number(other).unwrap_or(0.0),
        };
        RawMaterial {
            name: self.item_name.trim().to_string(),
            quantity,
            unit: self
                .unit
                .filter(|unit| !unit.trim().is_empty())
                .unwrap_or_else(|| "each".to_string()),
            category: self.category.filter(|c| !c.trim().is_empty()),
            dimensions: self.dimensions.filter(|d| !d.trim().is_empty()),
            location: self.location.filter(|l| !l.trim().is_empty()),
        }
    }
}

fn number_regex() -> &'static Regex {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER.get_or_init(|| Regex::new(r"-?\d+(?:,\d{3})*(?:\.\d+)?").expect("valid number regex"))
}

fn json_object_regex() -> &'static Regex {
    static OBJECT: OnceLock<Regex> = OnceLock::new();
    OBJECT.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid json object regex"))
}

/// Numbers as the model tends to write them: `12`, `"12"`, `"1,200 sf"`, `"40'"`.
fn lenient_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => number_regex()
            .find(text)
            .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok()),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Parse the first JSON object embedded in a model reply.
fn parse_page(content: &str) -> Result<PageExtraction, String> {
    let object = json_object_regex()
        .find(content)
        .ok_or_else(|| "reply contained no JSON object".to_string())?;
    serde_json::from_str(object.as_str()).map_err(|e| format!("malformed extraction JSON: {}", e))
}

/// Merge per-page replies in page order. The first page with complete
/// dimensions supplies them; otherwise the first page with any dimension.
fn merge_pages(pages: Vec<Result<PageExtraction, String>>) -> ExtractionOutput {
    let mut output = ExtractionOutput {
        extraction_method: Some(AI_EXTRACTION_METHOD.to_string()),
        complete: true,
        ..ExtractionOutput::default()
    };

    for (index, page) in pages.into_iter().enumerate() {
        let page = match page {
            Ok(page) => page,
            Err(message) => {
                output.complete = false;
                output.warnings.push(format!("page {}: {}", index + 1, message));
                continue;
            }
        };

        if let Some(dimensions) = page.building_dimensions.map(PageDimensions::into_dimensions) {
            let have_complete = output
                .building_dimensions
                .as_ref()
                .map_or(false, BuildingDimensions::is_complete);
            let have_any = output.building_dimensions.is_some();
            if !have_complete && (dimensions.is_complete() || (!have_any && dimensions.present_count() > 0)) {
                output.building_dimensions = Some(dimensions);
            }
        }

        output.materials.extend(
            page.lumber_materials
                .into_iter()
                .chain(page.other_materials)
                .map(PageMaterial::into_raw)
                .filter(|raw| !raw.name.is_empty()),
        );
    }

    output
}

/// Vision-model client for construction drawings.
pub struct VlmExtractionClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl VlmExtractionClient {
    pub fn new(config: &ExtractionConfig) -> EstimatorResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| EstimatorError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    async fn analyze_page(&self, page: &[u8]) -> EstimatorResult<String> {
        let request = VlmRequest {
            model: self.model.clone(),
            messages: vec![
                VlmMessage {
                    role: "system".to_string(),
                    content: vec![VlmContent::Text {
                        text: LUMBER_EXTRACTION_PROMPT.to_string(),
                    }],
                },
                VlmMessage {
                    role: "user".to_string(),
                    content: vec![
                        VlmContent::Image {
                            image_url: ImageUrl {
                                url: format!("data:image/png;base64,{}", BASE64.encode(page)),
                            },
                        },
                        VlmContent::Text {
                            text: "Extract the building dimensions and every material on this sheet.".to_string(),
                        },
                    ],
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EstimatorError::extraction_service(format!(
                "VLM API returned {}: {}",
                status, error_text
            )));
        }

        let reply: VlmResponse = response.json().await?;
        reply
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| EstimatorError::extraction_service("VLM reply had no choices"))
    }
}

#[async_trait]
impl DocumentExtractor for VlmExtractionClient {
    async fn extract(&self, document: &RenderedDocument) -> EstimatorResult<ExtractionOutput> {
        if document.pages.is_empty() {
            return Err(EstimatorError::validation("document", "Document has no pages"));
        }

        let mut pages = Vec::with_capacity(document.pages.len());
        for (index, page) in document.pages.iter().enumerate() {
            let content = self.analyze_page(page).await?;
            let parsed = parse_page(&content);
            if let Err(message) = &parsed {
                tracing::warn!(document = %document.name, page = index + 1, reason = %message, "Unusable page reply");
            }
            pages.push(parsed);
        }

        let output = merge_pages(pages);
        tracing::info!(
            document = %document.name,
            pages = document.pages.len(),
            materials = output.materials.len(),
            complete = output.complete,
            "Document extraction finished"
        );
        Ok(output)
    }
}

#[derive(Debug, Serialize)]
struct VlmRequest {
    model: String,
    messages: Vec<VlmMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct VlmMessage {
    role: String,
    content: Vec<VlmContent>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum VlmContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    Image { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct VlmResponse {
    choices: Vec<VlmChoice>,
}

#[derive(Debug, Deserialize)]
struct VlmChoice {
    message: VlmChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct VlmChoiceMessage {
    content: String,
}

const LUMBER_EXTRACTION_PROMPT: &str = r#"
You are a construction takeoff specialist reading architectural drawings.

Return a JSON object with the following structure:
{
  "building_dimensions": {"length": feet, "width": feet, "height": feet},
  "lumber_materials": [
    {"item_name": "...", "quantity": number, "unit": "...", "category": "Walls|Joist|Roof|Cornice and Decking|Post & Beams", "dimensions": "2X4X8", "location": "..."}
  ],
  "other_materials": [
    {"item_name": "...", "quantity": number, "unit": "...", "category": "electrical|plumbing|hvac|structural|mechanical|finishes", "location": "..."}
  ]
}

Use null for any dimension not shown on the sheet. Return ONLY valid JSON, no additional text.
"#;
