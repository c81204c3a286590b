//! Run configuration and Metrc credential loading.
//!
//! Everything the pipeline needs is assembled into an immutable [`Config`]
//! once at process start and passed by reference into each component; there
//! are no ambient global lookups.

use crate::error::{MenuError, Result};
use base64::Engine;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default Metrc API endpoint (Maryland instance)
pub const DEFAULT_BASE_URL: &str = "https://api-md.metrc.com";

/// Fixed start of the last-modified window, everything since go-live
pub const WINDOW_START: &str = "2020-01-01T00:00:00Z";

/// Packages per page for the paginated active-packages endpoint
pub const PAGE_SIZE: u32 = 20;

/// Per-request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Metrc API credentials, read from a local env file
#[derive(Debug, Clone)]
pub struct Credentials {
    pub vendor_key: String,
    pub user_key: String,
    pub license_number: String,
}

impl Credentials {
    /// Load credentials from a `KEY=VALUE` file. Blank lines and lines
    /// starting with `#` are ignored. Missing file or missing keys are
    /// fatal before any network activity happens.
    pub fn load(path: &Path) -> Result<Self> {
        log::debug!("Loading credentials from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            MenuError::Config(format!("cannot read credentials file {}: {}", path.display(), e))
        })?;

        let mut values = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                values.insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        Ok(Self {
            vendor_key: require(&values, "METRC_VENDOR_KEY")?,
            user_key: require(&values, "METRC_USER_KEY")?,
            license_number: require(&values, "METRC_LICENSE")?,
        })
    }

    /// Basic-auth header value Metrc expects: `base64(vendor_key:user_key)`
    pub fn basic_auth(&self) -> String {
        let token = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", self.vendor_key, self.user_key));
        format!("Basic {}", token)
    }
}

fn require(values: &HashMap<String, String>, key: &str) -> Result<String> {
    values
        .get(key)
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or_else(|| MenuError::Config(format!("credentials file is missing {}", key)))
}

/// Immutable per-run configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub base_url: String,
    pub spreadsheet_path: PathBuf,
    pub repo_dir: PathBuf,
    pub artifact_name: String,
    pub page_size: u32,
    /// Parallel lab-result requests; 1 keeps the loop sequential
    pub lab_concurrency: usize,
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
