//! Meal Explorer Core Domain Logic
//!
//! This crate contains:
//! - Catalog client and record normalization
//! - Thumbnail loading
//! - Grid placement and the generic list model
//! - View state controller
//! - Background worker
//! - Configuration and error types

pub mod cancel;
pub mod catalog;
pub mod config;
pub mod error;
pub mod grid;
pub mod listing;
pub mod model;
pub mod thumbnail;
pub mod transport;
pub mod view_state;
pub mod worker;

pub use cancel::CancelToken;
pub use catalog::{Catalog, CatalogClient, CatalogQuery, CatalogReply, DEFAULT_BASE_URL};
pub use config::{AppConfig, CatalogConfig, LayoutConfig, ThemeConfig, ThumbnailConfig, WindowConfig};
pub use error::{CatalogError, CatalogErrorKind, CatalogOperation, ConfigError, ThumbnailError, TransportError};
pub use grid::{plan, GridCell, GridPlacement};
pub use listing::{ListCell, ListItem, ListView, ThumbnailSlot, Trigger, ViewId};
pub use model::{AreaRecord, CategoryRecord, Ingredient, MealRecord, MealSummary};
pub use thumbnail::{Thumbnail, ThumbnailLoader, ThumbnailSize};
pub use transport::{HttpTransport, ReqwestTransport};
pub use view_state::{
    Action, FetchRequest, FetchTicket, MealDetail, Notice, NoticeLevel, Overlay, OverlayId,
    OverlayKind, OverlayPayload, OverlayStack, Owner, Screen, Tab, ThumbnailRequest,
    ThumbnailTarget, ViewConfig, ViewStateController,
};
pub use worker::{CatalogWorker, Wake, WorkerEvent};

use std::sync::Arc;

/// Catalog client and thumbnail loader sharing one HTTP client
pub fn connect(
    config: &CatalogConfig,
) -> Result<(CatalogClient<Arc<ReqwestTransport>>, ThumbnailLoader<Arc<ReqwestTransport>>), TransportError> {
    let transport = Arc::new(ReqwestTransport::new(config)?);
    tracing::info!(base_url = %config.base_url, "Catalog client ready");
    Ok((
        CatalogClient::new(transport.clone(), config.base_url.clone()),
        ThumbnailLoader::new(transport),
    ))
}
