//! Per-package lab-test retrieval and analyte filtering.

use super::client::USER_AGENT;
use super::MetrcClient;
use crate::error::{MenuError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tokio::task::JoinSet;

/// Analytes worth showing on the menu: the cannabinoids plus the terpene
/// panel. A test record is kept when its type name contains one of these,
/// case-insensitively; everything else (moisture, microbials, ...) is
/// discarded.
const MENU_ANALYTES: &[&str] = &[
    "cbd",
    "cbda",
    "cbn",
    "thc",
    "thca",
    "cbdv",
    "cbg",
    "cbga",
    "δ8-thc",
    "thcv",
    "cbc",
    "alpha-pinene",
    "camphene",
    "sabinene",
    "beta-pinene",
    "beta-myrcene",
    "3-carene",
    "alpha-terpinene",
    "p-cymene",
    "d-limonene",
    "eucalyptol",
    "o-cymene",
    "gamma-terpinene",
    "sabinene hydrate",
    "terpinolene",
    "enochone",
    "linalool",
    "fenchol",
    "isopulegol",
    "camphor",
    "isoborneol",
    "borneol",
    "menthol",
    "terpineol",
    "nerol",
    "pulegone",
    "geraniol",
    "geraniol acetate",
    "alpha-cedrene",
    "beta-caryophyllene",
    "alpha-humulene",
    "valencene",
    "cis-nerolidol",
    "trans-nerolidol",
    "caryophyllene oxide",
    "guaio1",
    "cedrol",
    "alpha-bisabolol",
];

#[derive(Debug, Deserialize)]
struct LabTestPage {
    #[serde(rename = "Data", default)]
    data: Vec<RawLabResult>,
}

#[derive(Debug, Deserialize)]
struct RawLabResult {
    #[serde(rename = "TestTypeName")]
    test_type_name: Option<String>,
    /// Numeric for potency results, text for pass/fail style results
    #[serde(rename = "TestResultLevel", default)]
    test_result_level: Value,
}

/// A retained analyte result, reduced to the two fields the menu shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabResult {
    #[serde(rename = "TestTypeName")]
    pub test_type_name: String,
    #[serde(rename = "TestResultLevel")]
    pub test_result_level: Value,
}

fn is_menu_analyte(test_type_name: &str) -> bool {
    let lower = test_type_name.to_lowercase();
    MENU_ANALYTES.iter().any(|a| lower.contains(a))
}

impl MetrcClient {
    /// Lab results for one package, filtered to the analyte vocabulary and
    /// sorted by test name.
    ///
    /// A 404 means the package has no results on file and yields an empty
    /// list; any other non-success status aborts the run.
    pub async fn fetch_lab_results(&self, package_id: i64) -> Result<Vec<LabResult>> {
        let url = format!("{}/labtests/v2/results", self.base_url);
        let package_id_param = package_id.to_string();

        log::debug!("Requesting lab results for package {}", package_id);
        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.auth_header)
            .header("User-Agent", USER_AGENT)
            .query(&[
                ("licenseNumber", self.license_number.as_str()),
                ("packageId", package_id_param.as_str()),
            ])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(MenuError::HttpStatus(response.status()));
        }

        let body: LabTestPage = response.json().await?;

        let mut results: Vec<LabResult> = body
            .data
            .into_iter()
            .filter_map(|raw| {
                let name = raw.test_type_name?;
                is_menu_analyte(&name).then_some(LabResult {
                    test_type_name: name,
                    test_result_level: raw.test_result_level,
                })
            })
            .collect();

        // Stable ordering regardless of API return order
        results.sort_by(|a, b| a.test_type_name.cmp(&b.test_type_name));
        Ok(results)
    }
}

/// Fetch lab results for every given package id, keyed by package id.
///
/// Sequential when `concurrency` is 0 or 1. With a higher cap, requests run
/// in a bounded [`JoinSet`]; aggregation stays keyed by package id, so task
/// completion order has no effect on the published menu.
pub async fn fetch_all_lab_results(
    client: &MetrcClient,
    package_ids: &[i64],
    concurrency: usize,
) -> Result<HashMap<i64, Vec<LabResult>>> {
    let mut results = HashMap::with_capacity(package_ids.len());

    if concurrency <= 1 {
        for &id in package_ids {
            results.insert(id, client.fetch_lab_results(id).await?);
        }
        return Ok(results);
    }

    let mut tasks = JoinSet::new();
    let mut pending = package_ids.iter().copied();

    loop {
        while tasks.len() < concurrency {
            match pending.next() {
                Some(id) => {
                    let client = client.clone();
                    tasks.spawn(async move { (id, client.fetch_lab_results(id).await) });
                }
                None => break,
            }
        }
        match tasks.join_next().await {
            Some(joined) => {
                let (id, fetched) = joined.expect("lab-result task panicked");
                results.insert(id, fetched?);
            }
            None => break,
        }
    }

    Ok(results)
}

#[cfg(test)]
#[path = "lab_results_tests.rs"]
mod tests;
