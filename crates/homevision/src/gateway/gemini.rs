use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{GatewayError, ModelGateway};
use crate::config::GeminiConfig;
use crate::designs::domain::{InventoryItem, SourceImage};

const INVENTORY_PROMPT: &str = "\
Analyze this renovated room.
List the 3-5 major NEW items visible.
For each, provide:
- Name
- Category
- Visual Description
- Estimated Price in PHP (Philippine Peso)";

/// REST client for the Generative Language `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    image_model: String,
    vision_model: String,
}

impl GeminiGateway {
    pub fn new(config: &GeminiConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            image_model: config.image_model.clone(),
            vision_model: config.vision_model.clone(),
        })
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GatewayError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);
        let started = Instant::now();

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let status = response.status();
        debug!(
            model,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "generateContent returned"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))
    }
}

impl std::fmt::Debug for GeminiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiGateway")
            .field("base_url", &self.base_url)
            .field("image_model", &self.image_model)
            .field("vision_model", &self.vision_model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn renovate(
        &self,
        source: &SourceImage,
        style_prompt: &str,
    ) -> Result<Vec<u8>, GatewayError> {
        let request = renovation_request(source, style_prompt);
        let response = self.generate(&self.image_model, &request).await?;
        extract_image(response)
    }

    async fn analyze(&self, rendered_png: &[u8]) -> Result<Vec<InventoryItem>, GatewayError> {
        let request = inventory_request(rendered_png);
        let response = self.generate(&self.vision_model, &request).await?;
        extract_inventory(response)
    }
}

fn renovation_request(source: &SourceImage, style_prompt: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(vec![
            Part::text(style_prompt),
            Part::inline(&source.mime_type, &source.bytes),
        ])],
        generation_config: GenerationConfig {
            response_modalities: Some(vec!["IMAGE"]),
            temperature: Some(0.0),
            ..GenerationConfig::default()
        },
    }
}

fn inventory_request(rendered_png: &[u8]) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(vec![
            Part::text(INVENTORY_PROMPT),
            Part::inline("image/png", rendered_png),
        ])],
        generation_config: GenerationConfig {
            response_mime_type: Some("application/json"),
            response_schema: Some(inventory_schema()),
            ..GenerationConfig::default()
        },
    }
}

fn inventory_schema() -> Value {
    let fields = [
        "item_name",
        "category",
        "visual_description",
        "estimated_price_php",
    ];

    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "item_name": { "type": "STRING" },
                "category": { "type": "STRING" },
                "visual_description": { "type": "STRING" },
                "estimated_price_php": { "type": "INTEGER" }
            },
            "required": fields,
            "propertyOrdering": fields
        }
    })
}

fn first_parts(response: GenerateContentResponse) -> Vec<ResponsePart> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .unwrap_or_default()
}

fn extract_image(response: GenerateContentResponse) -> Result<Vec<u8>, GatewayError> {
    let blob = first_parts(response)
        .into_iter()
        .find_map(|part| part.inline_data)
        .ok_or(GatewayError::MissingImage)?;

    let bytes = STANDARD
        .decode(blob.data.as_bytes())
        .map_err(GatewayError::MalformedImage)?;
    if bytes.is_empty() {
        return Err(GatewayError::MissingImage);
    }
    Ok(bytes)
}

fn extract_inventory(
    response: GenerateContentResponse,
) -> Result<Vec<InventoryItem>, GatewayError> {
    let text = first_parts(response)
        .into_iter()
        .next()
        .and_then(|part| part.text)
        .ok_or(GatewayError::MissingInventory)?;

    serde_json::from_str(&text).map_err(GatewayError::MalformedInventory)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

impl Content {
    fn user(parts: Vec<Part>) -> Self {
        Self { role: "user", parts }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<Blob>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }

    fn inline(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            text: None,
            inline_data: Some(Blob {
                mime_type: mime_type.to_string(),
                data: STANDARD.encode(bytes),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, alias = "inline_data")]
    inline_data: Option<ResponseBlob>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlob {
    data: String,
}
