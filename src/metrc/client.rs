//! HTTP client construction for the Metrc API.

use crate::config::{Config, REQUEST_TIMEOUT_SECS};
use crate::error::Result;
use std::time::Duration;

pub(crate) const USER_AGENT: &str = "menu_sync/1.0";

/// Metrc API client
#[derive(Debug, Clone)]
pub struct MetrcClient {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) auth_header: String,
    pub(crate) license_number: String,
}

impl MetrcClient {
    /// Build a client from the run configuration. Every request carries the
    /// basic-auth header and is bounded by the fixed per-call timeout.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_header: config.credentials.basic_auth(),
            license_number: config.credentials.license_number.clone(),
        })
    }
}
