use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::warn;

use super::domain::{DesignId, InstallmentApplication, SourceImage};
use super::prompt::DEFAULT_STYLE;
use super::repository::DesignRepository;
use super::service::{RenovationError, RenovationService};
use crate::gateway::ModelGateway;

/// Phone cameras routinely produce photos well past axum's 2 MiB default.
pub const UPLOAD_LIMIT_BYTES: usize = 20 * 1024 * 1024;

/// Router builder exposing the renovation, lookup, and installment endpoints.
pub fn design_router<R, G>(service: Arc<RenovationService<R, G>>) -> Router
where
    R: DesignRepository + 'static,
    G: ModelGateway + 'static,
{
    Router::new()
        .route("/renovate", post(renovate_handler::<R, G>))
        .route(
            "/design-results/:design_id",
            get(design_results_handler::<R, G>),
        )
        .route("/installment-items/apply", post(apply_handler::<R, G>))
        .route(
            "/installment-items/:design_id",
            get(installment_items_handler::<R, G>),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
        .with_state(service)
}

/// Fields pulled out of the `/renovate` multipart form.
#[derive(Debug)]
pub(crate) struct RenovationForm {
    pub(crate) image: SourceImage,
    pub(crate) style: String,
}

impl RenovationForm {
    pub(crate) async fn read(mut multipart: Multipart) -> Result<Self, String> {
        let mut image = None;
        let mut style = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| format!("invalid multipart body: {err}"))?
        {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("file") => {
                    let declared = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|err| format!("unable to read uploaded file: {err}"))?;
                    image = Some(SourceImage::with_declared_type(
                        bytes.to_vec(),
                        declared.as_deref(),
                    ));
                }
                Some("style") => {
                    let text = field
                        .text()
                        .await
                        .map_err(|err| format!("unable to read style: {err}"))?;
                    style = Some(text);
                }
                _ => {}
            }
        }

        let image = image
            .filter(|image| !image.bytes.is_empty())
            .ok_or_else(|| "file is required".to_string())?;

        Ok(Self {
            image,
            style: style.unwrap_or_else(|| DEFAULT_STYLE.to_string()),
        })
    }
}

pub(crate) async fn renovate_handler<R, G>(
    State(service): State<Arc<RenovationService<R, G>>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response
where
    R: DesignRepository + 'static,
    G: ModelGateway + 'static,
{
    let form = match multipart {
        Ok(multipart) => RenovationForm::read(multipart).await,
        Err(rejection) => Err(rejection.body_text()),
    };

    let form = match form {
        Ok(form) => form,
        Err(message) => {
            warn!(%message, "rejected renovation upload");
            return error_response(StatusCode::BAD_REQUEST, message);
        }
    };

    match service.create_design(form.image, &form.style).await {
        Ok(design_id) => {
            (StatusCode::OK, Json(json!({ "designId": design_id }))).into_response()
        }
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

pub(crate) async fn design_results_handler<R, G>(
    State(service): State<Arc<RenovationService<R, G>>>,
    Path(design_id): Path<String>,
) -> Response
where
    R: DesignRepository + 'static,
    G: ModelGateway + 'static,
{
    let id = DesignId(design_id);
    match service.get_design(&id) {
        Ok(record) => (StatusCode::OK, Json(record.results_view())).into_response(),
        Err(err) => lookup_error(&id, err),
    }
}

pub(crate) async fn installment_items_handler<R, G>(
    State(service): State<Arc<RenovationService<R, G>>>,
    Path(design_id): Path<String>,
) -> Response
where
    R: DesignRepository + 'static,
    G: ModelGateway + 'static,
{
    let id = DesignId(design_id);
    match service.installment_items(&id) {
        Ok(items) => (StatusCode::OK, Json(json!({ "items": items }))).into_response(),
        Err(err) => lookup_error(&id, err),
    }
}

pub(crate) async fn apply_handler<R, G>(
    State(service): State<Arc<RenovationService<R, G>>>,
    Json(application): Json<InstallmentApplication>,
) -> Response
where
    R: DesignRepository + 'static,
    G: ModelGateway + 'static,
{
    let acknowledgement = service.apply_installment(application);
    (StatusCode::OK, Json(acknowledgement)).into_response()
}

fn lookup_error(id: &DesignId, err: RenovationError) -> Response {
    if err.is_not_found() {
        error_response(StatusCode::NOT_FOUND, format!("design {id} not found"))
    } else {
        error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
