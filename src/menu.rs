//! Menu assembly: joins packages, pricing metadata and lab results into
//! the published payload.

use crate::error::Result;
use crate::metrc::{LabResult, Package};
use crate::spreadsheet::{BulkRule, PricingSheet};
use serde::Serialize;
use std::collections::HashMap;

/// One menu line item. The field order here is the serialized key order
/// and must stay stable: the publish step hashes the serialized bytes.
#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Label")]
    pub label: Option<String>,
    #[serde(rename = "ItemName")]
    pub item_name: String,
    #[serde(rename = "Quantity")]
    pub quantity: Option<f64>,
    #[serde(rename = "DateReceived")]
    pub date_received: Option<String>,
    #[serde(rename = "PackageDate")]
    pub package_date: Option<String>,
    #[serde(rename = "CreatedAt")]
    pub created_at: Option<String>,
    #[serde(rename = "Type")]
    pub product_type: Option<String>,
    #[serde(rename = "Price")]
    pub price: Option<f64>,
    #[serde(rename = "LabResults")]
    pub lab_results: Vec<LabResult>,
}

/// The published artifact: `{"items": [...], "bulkRules": [...]}`
#[derive(Debug, Clone, Serialize)]
pub struct MenuPayload {
    pub items: Vec<MenuItem>,
    #[serde(rename = "bulkRules")]
    pub bulk_rules: Vec<BulkRule>,
}

impl MenuPayload {
    /// Compact serialization with stable key order
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Join packages with pricing metadata (by trimmed item name) and lab
/// results (by package id). Items are sorted by id ascending so repeated
/// runs over unchanged data serialize byte-identically. A metadata miss
/// yields null Price/Type, never an error.
pub fn build_menu(
    packages: &HashMap<i64, Package>,
    lab_results: &HashMap<i64, Vec<LabResult>>,
    sheet: &PricingSheet,
) -> MenuPayload {
    let mut items: Vec<MenuItem> = packages
        .values()
        .map(|pkg| {
            let info = sheet.get(&pkg.item_name);
            MenuItem {
                id: pkg.id,
                label: pkg.label.clone(),
                item_name: pkg.item_name.clone(),
                quantity: pkg.quantity,
                date_received: pkg.date_received.clone(),
                package_date: pkg.package_date.clone(),
                created_at: pkg.last_modified.clone(),
                product_type: info.and_then(|i| i.product_type.clone()),
                price: info.and_then(|i| i.price),
                lab_results: lab_results.get(&pkg.id).cloned().unwrap_or_default(),
            }
        })
        .collect();
    items.sort_by_key(|item| item.id);

    MenuPayload {
        items,
        bulk_rules: sheet.bulk_rules().to_vec(),
    }
}

#[cfg(test)]
#[path = "menu_tests.rs"]
mod tests;
