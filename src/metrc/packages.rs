//! Active-package retrieval with pagination and room filtering.

use super::client::USER_AGENT;
use super::MetrcClient;
use crate::error::{MenuError, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// Rooms whose packages appear on the public menu (compared lowercased)
const MENU_ROOMS: &[&str] = &["vault - finished goods", "low inventory"];

/// One page of the active-packages endpoint
#[derive(Debug, Deserialize)]
struct PackagePage {
    #[serde(rename = "Data", default)]
    data: Vec<RawPackage>,
    #[serde(rename = "TotalPages", default = "default_total_pages")]
    total_pages: u32,
}

fn default_total_pages() -> u32 {
    1
}

/// Package record as returned by Metrc. Only the fields the menu needs are
/// deserialized; the item name appears either nested or flat depending on
/// the endpoint version.
#[derive(Debug, Deserialize)]
struct RawPackage {
    #[serde(rename = "Id")]
    id: i64,
    #[serde(rename = "Label")]
    label: Option<String>,
    #[serde(rename = "Item")]
    item: Option<RawItem>,
    #[serde(rename = "ItemName")]
    item_name: Option<String>,
    #[serde(rename = "Quantity")]
    quantity: Option<f64>,
    #[serde(rename = "LocationName")]
    location_name: Option<String>,
    #[serde(rename = "ReceivedDateTime")]
    received_date_time: Option<String>,
    #[serde(rename = "ReceivedDate")]
    received_date: Option<String>,
    #[serde(rename = "PackagedDate")]
    packaged_date: Option<String>,
    #[serde(rename = "PackageDate")]
    package_date: Option<String>,
    #[serde(rename = "LastModified")]
    last_modified: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(rename = "Name")]
    name: Option<String>,
}

impl RawPackage {
    /// Nested item name preferred; the flat field is the fallback on older
    /// response shapes.
    fn resolved_item_name(&self) -> String {
        self.item
            .as_ref()
            .and_then(|i| i.name.as_deref())
            .filter(|n| !n.trim().is_empty())
            .or(self.item_name.as_deref())
            .unwrap_or_default()
            .trim()
            .to_string()
    }

    fn in_menu_room(&self) -> bool {
        self.location_name
            .as_deref()
            .map(|l| MENU_ROOMS.contains(&l.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}

/// An active inventory package retained for the menu
#[derive(Debug, Clone)]
pub struct Package {
    pub id: i64,
    pub label: Option<String>,
    pub item_name: String,
    pub quantity: Option<f64>,
    pub date_received: Option<String>,
    pub package_date: Option<String>,
    pub last_modified: Option<String>,
}

impl MetrcClient {
    /// Fetch all active packages modified within `[start, end]`, keeping
    /// only those in a menu room.
    ///
    /// Pages are requested sequentially until the page count reported by
    /// the API is reached. Results are keyed by package id, so a duplicate
    /// id across pages collapses to the last-seen record. Any non-success
    /// status aborts the run; a partial inventory must never look complete
    /// to menu consumers.
    pub async fn fetch_active_packages(
        &self,
        start: &str,
        end: &str,
        page_size: u32,
    ) -> Result<HashMap<i64, Package>> {
        let url = format!("{}/packages/v2/active", self.base_url);
        let page_size_param = page_size.to_string();
        let mut packages = HashMap::new();
        let mut page = 1u32;

        loop {
            log::debug!("Requesting packages page {}", page);
            let page_param = page.to_string();
            let response = self
                .client
                .get(&url)
                .header("Authorization", &self.auth_header)
                .header("User-Agent", USER_AGENT)
                .query(&[
                    ("licenseNumber", self.license_number.as_str()),
                    ("pageNumber", page_param.as_str()),
                    ("pageSize", page_size_param.as_str()),
                    ("lastModifiedStart", start),
                    ("lastModifiedEnd", end),
                ])
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(MenuError::HttpStatus(response.status()));
            }

            let body: PackagePage = response.json().await?;

            for raw in body.data {
                if !raw.in_menu_room() {
                    continue;
                }
                let item_name = raw.resolved_item_name();
                packages.insert(
                    raw.id,
                    Package {
                        id: raw.id,
                        label: raw.label,
                        item_name,
                        quantity: raw.quantity,
                        date_received: raw.received_date_time.or(raw.received_date),
                        package_date: raw.packaged_date.or(raw.package_date),
                        last_modified: raw.last_modified,
                    },
                );
            }

            if page >= body.total_pages {
                break;
            }
            page += 1;
        }

        log::info!("Retained {} packages across {} page(s)", packages.len(), page);
        Ok(packages)
    }
}

#[cfg(test)]
#[path = "packages_tests.rs"]
mod tests;
