//! Application error types

use std::fmt;
use thiserror::Error;

/// Catalog operations, used to name the failed call in user notices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogOperation {
    SearchByName,
    LookupById,
    SearchByIngredient,
    ListCategories,
    FilterByCategory,
    ListAreas,
    FilterByArea,
    RandomMeal,
}

impl CatalogOperation {
    /// Human readable operation name
    pub fn label(self) -> &'static str {
        match self {
            CatalogOperation::SearchByName => "search by name",
            CatalogOperation::LookupById => "lookup by id",
            CatalogOperation::SearchByIngredient => "search by ingredient",
            CatalogOperation::ListCategories => "list categories",
            CatalogOperation::FilterByCategory => "filter by category",
            CatalogOperation::ListAreas => "list areas",
            CatalogOperation::FilterByArea => "filter by area",
            CatalogOperation::RandomMeal => "random meal",
        }
    }
}

impl fmt::Display for CatalogOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Low-level HTTP failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Why a catalog call failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogErrorKind {
    // Transport failure or non-success status
    #[error("network error: {0}")]
    Network(#[from] TransportError),

    // Body was not the expected JSON envelope
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// A failed catalog call. Empty results are never reported through this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation} failed: {kind}")]
pub struct CatalogError {
    pub operation: CatalogOperation,
    pub kind: CatalogErrorKind,
}

impl CatalogError {
    pub fn network(operation: CatalogOperation, cause: TransportError) -> Self {
        Self {
            operation,
            kind: CatalogErrorKind::Network(cause),
        }
    }

    pub fn malformed(operation: CatalogOperation, detail: impl Into<String>) -> Self {
        Self {
            operation,
            kind: CatalogErrorKind::MalformedResponse(detail.into()),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self.kind, CatalogErrorKind::Network(_))
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match &self.kind {
            CatalogErrorKind::Network(TransportError::Status(code)) => format!(
                "The {} request failed: the catalog answered with status {}.",
                self.operation, code
            ),
            CatalogErrorKind::Network(cause) => {
                format!("The {} request failed: {}", self.operation, cause)
            }
            CatalogErrorKind::MalformedResponse(_) => format!(
                "The {} request failed: the catalog sent an unexpected response.",
                self.operation
            ),
        }
    }
}

/// Thumbnail fetch or decode failure. Always contained at the item level.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailError {
    #[error("thumbnail fetch failed: {0}")]
    Transport(#[from] TransportError),

    #[error("image decode error: {0}")]
    Decode(String),

    #[error("invalid target size {0}x{1}")]
    InvalidSize(u32, u32),
}

impl From<image::ImageError> for ThumbnailError {
    fn from(e: image::ImageError) -> Self {
        ThumbnailError::Decode(e.to_string())
    }
}

/// Configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
