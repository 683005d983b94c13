//! HTTP transport

use crate::config::CatalogConfig;
use crate::error::TransportError;
use std::time::Duration;

/// Byte-level GET used by the catalog client and the thumbnail loader
pub trait HttpTransport: Send + Sync {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

/// `reqwest` blocking transport. Must not be called from inside an async
/// runtime; the worker thread owns it.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(config: &CatalogConfig) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        tracing::trace!(url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        (**self).get(url)
    }
}
