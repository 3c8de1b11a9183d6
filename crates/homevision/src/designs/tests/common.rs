use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::Value;

use crate::designs::domain::{DesignId, DesignRecord, InventoryItem, NewDesign, SourceImage};
use crate::designs::repository::{DesignRepository, InMemoryDesignRepository, RepositoryError};
use crate::designs::{design_router, RenovationService};
use crate::gateway::{GatewayError, ModelGateway};

pub(super) const BOUNDARY: &str = "homevision-test-boundary";

pub(super) fn sofa() -> InventoryItem {
    InventoryItem {
        item_name: "Sofa".to_string(),
        category: "Seating".to_string(),
        visual_description: "Pale oak frame with oatmeal boucle cushions".to_string(),
        estimated_price_php: 15000,
    }
}

pub(super) fn pendant_lamp() -> InventoryItem {
    InventoryItem {
        item_name: "Pendant Lamp".to_string(),
        category: "Lighting".to_string(),
        visual_description: "White ribbed glass shade".to_string(),
        estimated_price_php: 3800,
    }
}

/// Gateway double that replays canned model output and records what it was sent.
#[derive(Default)]
pub(super) struct ScriptedGateway {
    image: Option<Vec<u8>>,
    inventory: Option<Vec<InventoryItem>>,
    renovations: Mutex<Vec<(String, String)>>,
    analyses: Mutex<Vec<Vec<u8>>>,
}

impl ScriptedGateway {
    pub(super) fn succeeding(image: &[u8], inventory: Vec<InventoryItem>) -> Self {
        Self {
            image: Some(image.to_vec()),
            inventory: Some(inventory),
            ..Self::default()
        }
    }

    pub(super) fn failing_render() -> Self {
        Self::default()
    }

    pub(super) fn failing_analysis(image: &[u8]) -> Self {
        Self {
            image: Some(image.to_vec()),
            ..Self::default()
        }
    }

    /// `(mime type, prompt)` for each renovate call.
    pub(super) fn renovations(&self) -> Vec<(String, String)> {
        self.renovations.lock().expect("gateway mutex poisoned").clone()
    }

    pub(super) fn analyses(&self) -> Vec<Vec<u8>> {
        self.analyses.lock().expect("gateway mutex poisoned").clone()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn renovate(
        &self,
        source: &SourceImage,
        style_prompt: &str,
    ) -> Result<Vec<u8>, GatewayError> {
        self.renovations
            .lock()
            .expect("gateway mutex poisoned")
            .push((source.mime_type.clone(), style_prompt.to_string()));
        self.image.clone().ok_or(GatewayError::MissingImage)
    }

    async fn analyze(&self, rendered_png: &[u8]) -> Result<Vec<InventoryItem>, GatewayError> {
        self.analyses
            .lock()
            .expect("gateway mutex poisoned")
            .push(rendered_png.to_vec());
        self.inventory
            .clone()
            .ok_or(GatewayError::MissingInventory)
    }
}

pub(super) struct UnavailableRepository;

impl DesignRepository for UnavailableRepository {
    fn put(&self, _design: NewDesign) -> Result<DesignId, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn get(&self, _id: &DesignId) -> Result<DesignRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn len(&self) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

pub(super) type MemoryService = RenovationService<InMemoryDesignRepository, ScriptedGateway>;

pub(super) fn build_service(
    gateway: ScriptedGateway,
) -> (Arc<MemoryService>, InMemoryDesignRepository, Arc<ScriptedGateway>) {
    let repository = InMemoryDesignRepository::default();
    let gateway = Arc::new(gateway);
    let service = Arc::new(RenovationService::new(
        Arc::new(repository.clone()),
        gateway.clone(),
    ));
    (service, repository, gateway)
}

pub(super) fn router_with_service(service: Arc<MemoryService>) -> axum::Router {
    design_router(service)
}

pub(super) fn multipart_upload(image: Option<&[u8]>, style: Option<&str>) -> Request<Body> {
    let mut body = Vec::new();
    if let Some(bytes) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"room.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    if let Some(style) = style {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"style\"\r\n\r\n{style}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/renovate")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
