//! Boundary around the remote generative models.
//!
//! Callers see image bytes in and [`InventoryItem`]s out; vendor request and response
//! envelopes stay inside the concrete gateway modules.

mod gemini;

pub use gemini::GeminiGateway;

use async_trait::async_trait;

use crate::designs::domain::{InventoryItem, SourceImage};

/// The two remote capabilities a renovation run depends on.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Restyle the room in `source` according to `style_prompt`, returning PNG bytes.
    async fn renovate(
        &self,
        source: &SourceImage,
        style_prompt: &str,
    ) -> Result<Vec<u8>, GatewayError>;

    /// List the major furniture pieces visible in a rendered PNG.
    async fn analyze(&self, rendered_png: &[u8]) -> Result<Vec<InventoryItem>, GatewayError>;
}

/// Every variant is a generation failure from the pipeline's point of view.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("AI did not return an image.")]
    MissingImage,
    #[error("image payload was not valid base64: {0}")]
    MalformedImage(#[source] base64::DecodeError),
    #[error("AI did not return an inventory.")]
    MissingInventory,
    #[error("inventory was not valid structured output: {0}")]
    MalformedInventory(#[source] serde_json::Error),
    #[error("model returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model request failed: {0}")]
    Transport(String),
}
