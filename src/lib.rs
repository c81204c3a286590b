//! Menu Sync - Dispensary Live-Menu Publisher
//!
//! This application joins active inventory from the Metrc tracking API with
//! pricing metadata from a spreadsheet and per-package lab results, and
//! publishes the result as a single JSON artifact in a git-backed store.

pub mod config;
pub mod error;
pub mod menu;
pub mod metrc;
pub mod publish;
pub mod spreadsheet;

pub use error::{MenuError, Result};
pub use menu::{build_menu, MenuItem, MenuPayload};
