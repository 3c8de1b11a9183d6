use std::sync::Arc;

use tracing::{error, info};

use super::domain::{
    Acknowledgement, DesignId, DesignRecord, InstallmentApplication, InstallmentItemView,
    NewDesign, RenderedImage, SourceImage,
};
use super::prompt::{normalize_style, style_prompt};
use super::repository::{DesignRepository, RepositoryError};
use crate::gateway::{GatewayError, ModelGateway};

/// Runs the renovate → analyze → store pipeline and serves stored designs back out.
pub struct RenovationService<R, G> {
    repository: Arc<R>,
    gateway: Arc<G>,
}

impl<R, G> RenovationService<R, G>
where
    R: DesignRepository + 'static,
    G: ModelGateway + 'static,
{
    pub fn new(repository: Arc<R>, gateway: Arc<G>) -> Self {
        Self {
            repository,
            gateway,
        }
    }

    /// Restyle the room, inventory the result, and store it.
    ///
    /// The two model calls run strictly in sequence and neither is retried. A failure in
    /// either phase returns before anything reaches the repository.
    pub async fn create_design(
        &self,
        source: SourceImage,
        style: &str,
    ) -> Result<DesignId, RenovationError> {
        let style = normalize_style(style);
        info!(style, bytes = source.bytes.len(), "renovation requested");

        let rendered = self
            .gateway
            .renovate(&source, &style_prompt(style))
            .await
            .map_err(|err| {
                error!(style, error = %err, "image generation failed");
                err
            })?;
        info!(style, bytes = rendered.len(), "renovation complete, starting analysis");

        let inventory = self.gateway.analyze(&rendered).await.map_err(|err| {
            error!(style, error = %err, "inventory analysis failed");
            err
        })?;
        info!(style, items = inventory.len(), "analysis complete");

        let id = self.repository.put(NewDesign {
            style: style.to_string(),
            image: RenderedImage::png(rendered),
            inventory,
        })?;
        info!(design_id = %id, "design stored");

        Ok(id)
    }

    pub fn get_design(&self, id: &DesignId) -> Result<DesignRecord, RenovationError> {
        Ok(self.repository.get(id)?)
    }

    pub fn installment_items(
        &self,
        id: &DesignId,
    ) -> Result<Vec<InstallmentItemView>, RenovationError> {
        let record = self.repository.get(id)?;
        Ok(record.installment_items())
    }

    /// Acknowledge a financing request. Nothing is stored and the design id is not checked.
    pub fn apply_installment(&self, application: InstallmentApplication) -> Acknowledgement {
        info!(
            design_id = %application.design_id,
            items = application.items.len(),
            down_payment = application.down_payment,
            installment_months = application.installment_months,
            monthly_payment = application.monthly_payment,
            total_amount = application.total_amount,
            received_at = %chrono::Utc::now().to_rfc3339(),
            "installment application received"
        );
        Acknowledgement::submitted()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenovationError {
    #[error(transparent)]
    Generation(#[from] GatewayError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl RenovationError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(RepositoryError::NotFound))
    }
}
