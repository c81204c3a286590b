//! Metrc API client: active packages and per-package lab test results.
//!
//! [`MetrcClient`] holds the shared HTTP client and auth header; the
//! endpoint-specific impls live in `packages.rs` and `lab_results.rs`.

mod client;
mod lab_results;
mod packages;

pub use client::MetrcClient;
pub use lab_results::{fetch_all_lab_results, LabResult};
pub use packages::Package;
