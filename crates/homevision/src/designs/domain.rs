use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Placeholder artwork returned for every installment item until catalog imagery exists.
pub const PLACEHOLDER_ITEM_IMAGE: &str = "https://via.placeholder.com/150";

/// Opaque identifier handed back to clients after a renovation run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DesignId(pub String);

impl DesignId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for DesignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Furniture or decor identified in a rendered room.
///
/// Field names match the structured output requested from the vision model, which is
/// also the shape clients read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item_name: String,
    pub category: String,
    pub visual_description: String,
    pub estimated_price_php: u64,
}

/// Room photo as uploaded by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl SourceImage {
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: "image/jpeg".to_string(),
        }
    }

    /// Keeps the declared type when it names an image, otherwise assumes JPEG.
    pub fn with_declared_type(bytes: Vec<u8>, declared: Option<&str>) -> Self {
        match declared {
            Some(mime) if mime.starts_with("image/") => Self {
                bytes,
                mime_type: mime.to_string(),
            },
            _ => Self::jpeg(bytes),
        }
    }
}

/// Renovated image in raw and display-ready form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    bytes: Vec<u8>,
    data_uri: String,
}

impl RenderedImage {
    pub fn png(bytes: Vec<u8>) -> Self {
        let data_uri = format!("data:image/png;base64,{}", STANDARD.encode(&bytes));
        Self { bytes, data_uri }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }
}

/// Everything a pipeline run produced, before the store assigns an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDesign {
    pub style: String,
    pub image: RenderedImage,
    pub inventory: Vec<InventoryItem>,
}

/// Stored output of one renovation run. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignRecord {
    pub id: DesignId,
    pub style: String,
    pub image: RenderedImage,
    pub inventory: Vec<InventoryItem>,
    pub created_at: DateTime<Utc>,
}

impl DesignRecord {
    pub fn from_new(id: DesignId, design: NewDesign) -> Self {
        Self {
            id,
            style: design.style,
            image: design.image,
            inventory: design.inventory,
            created_at: Utc::now(),
        }
    }

    pub fn results_view(&self) -> DesignResultsView {
        DesignResultsView {
            image: self.image.data_uri().to_string(),
            inventory: self.inventory.clone(),
        }
    }

    /// Positional ids follow the stored inventory order.
    pub fn installment_items(&self) -> Vec<InstallmentItemView> {
        self.inventory
            .iter()
            .enumerate()
            .map(|(index, item)| InstallmentItemView {
                id: index.to_string(),
                name: item.item_name.clone(),
                price: item.estimated_price_php,
                description: item.visual_description.clone(),
                category: item.category.clone(),
                image: PLACEHOLDER_ITEM_IMAGE.to_string(),
            })
            .collect()
    }
}

/// Payload for `GET /design-results/{designId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesignResultsView {
    pub image: String,
    pub inventory: Vec<InventoryItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentItemView {
    pub id: String,
    pub name: String,
    pub price: u64,
    pub description: String,
    pub category: String,
    pub image: String,
}

/// Financing request submitted from the client's installment calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentApplication {
    pub design_id: String,
    pub items: Vec<Map<String, Value>>,
    pub down_payment: i64,
    pub installment_months: i64,
    pub monthly_payment: i64,
    pub total_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Acknowledgement {
    pub status: &'static str,
    pub message: String,
}

impl Acknowledgement {
    pub fn submitted() -> Self {
        Self {
            status: "success",
            message: "Installment application submitted successfully".to_string(),
        }
    }
}
