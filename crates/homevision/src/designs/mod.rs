//! Renovation pipeline, design storage, and the client-facing views built on top.

pub mod domain;
pub mod prompt;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Acknowledgement, DesignId, DesignRecord, DesignResultsView, InstallmentApplication,
    InstallmentItemView, InventoryItem, NewDesign, RenderedImage, SourceImage,
    PLACEHOLDER_ITEM_IMAGE,
};
pub use prompt::DEFAULT_STYLE;
pub use repository::{DesignRepository, InMemoryDesignRepository, RepositoryError};
pub use router::design_router;
pub use service::{RenovationError, RenovationService};
