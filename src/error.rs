//! Error types for menu_sync

use std::fmt;

/// Unified error type for menu_sync operations
#[derive(Debug)]
pub enum MenuError {
    /// Missing or malformed credentials/configuration
    Config(String),
    /// HTTP request failed (network error, timeout, etc.)
    Network(reqwest::Error),
    /// Failed to parse JSON response
    Parse(serde_json::Error),
    /// HTTP error status code
    HttpStatus(reqwest::StatusCode),
    /// Pricing spreadsheet could not be read
    Spreadsheet(calamine::Error),
    /// Pricing spreadsheet has an unexpected layout
    SheetFormat(String),
    /// File I/O error
    Io(std::io::Error),
    /// Versioned-store operation failed (pull, commit or push)
    Sync(String),
}

impl fmt::Display for MenuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuError::Config(msg) => write!(f, "Configuration error: {}", msg),
            MenuError::Network(e) => write!(f, "Network error: {}", e),
            MenuError::Parse(e) => write!(f, "Parse error: {}", e),
            MenuError::HttpStatus(status) => write!(f, "HTTP error: {}", status),
            MenuError::Spreadsheet(e) => write!(f, "Spreadsheet error: {}", e),
            MenuError::SheetFormat(msg) => write!(f, "Spreadsheet format error: {}", msg),
            MenuError::Io(e) => write!(f, "I/O error: {}", e),
            MenuError::Sync(msg) => write!(f, "Sync error: {}", msg),
        }
    }
}

impl std::error::Error for MenuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MenuError::Network(e) => Some(e),
            MenuError::Parse(e) => Some(e),
            MenuError::Spreadsheet(e) => Some(e),
            MenuError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MenuError {
    fn from(err: reqwest::Error) -> Self {
        MenuError::Network(err)
    }
}

impl From<serde_json::Error> for MenuError {
    fn from(err: serde_json::Error) -> Self {
        MenuError::Parse(err)
    }
}

impl From<calamine::Error> for MenuError {
    fn from(err: calamine::Error) -> Self {
        MenuError::Spreadsheet(err)
    }
}

impl From<std::io::Error> for MenuError {
    fn from(err: std::io::Error) -> Self {
        MenuError::Io(err)
    }
}

/// Result alias for menu_sync operations
pub type Result<T> = std::result::Result<T, MenuError>;
