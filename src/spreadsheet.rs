//! Pricing spreadsheet loading and parsing.
//!
//! Worksheet 1 is the product table (Product / Price / Type / BulkPricing);
//! an optional "BulkRules" worksheet supplies quantity discounts. The
//! workbook itself is required, individual bad rows are skipped.

use crate::error::{MenuError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Name of the optional discount worksheet
const BULK_RULES_SHEET: &str = "BulkRules";

/// Pricing metadata for one product, keyed by trimmed product name
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInfo {
    pub price: Option<f64>,
    pub product_type: Option<String>,
    /// Embedded per-product pricing structure; opaque to the pipeline,
    /// validated only as JSON
    pub bulk_pricing: Option<Value>,
}

/// A quantity discount rule, carried into the menu unjoined. The consumer
/// of the menu resolves the product group, not this pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkRule {
    #[serde(rename = "ProductGroup")]
    pub product_group: String,
    #[serde(rename = "MinQty")]
    pub min_qty: i64,
    #[serde(rename = "Price")]
    pub price: f64,
}

/// In-memory view of the pricing spreadsheet
#[derive(Debug, Default)]
pub struct PricingSheet {
    products: HashMap<String, ProductInfo>,
    bulk_rules: Vec<BulkRule>,
}

impl PricingSheet {
    /// Load from a spreadsheet file. A missing or malformed workbook is
    /// fatal; the menu cannot be published without pricing context.
    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Loading pricing spreadsheet: {}", path.display());
        let mut workbook = open_workbook_auto(path)?;

        let first_sheet = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| MenuError::SheetFormat("workbook has no worksheets".to_string()))?;
        let range = workbook.worksheet_range(&first_sheet)?;
        let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
        let products = parse_product_rows(&rows)?;

        let bulk_rules = if workbook.sheet_names().iter().any(|n| n == BULK_RULES_SHEET) {
            let range = workbook.worksheet_range(BULK_RULES_SHEET)?;
            let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
            parse_bulk_rules(&rows)
        } else {
            Vec::new()
        };

        log::info!(
            "Loaded {} products and {} bulk rules",
            products.len(),
            bulk_rules.len()
        );
        Ok(Self {
            products,
            bulk_rules,
        })
    }

    /// Look up a product by exact trimmed name. A miss is a valid answer,
    /// not an error.
    pub fn get(&self, product_name: &str) -> Option<&ProductInfo> {
        self.products.get(product_name.trim())
    }

    pub fn bulk_rules(&self) -> &[BulkRule] {
        &self.bulk_rules
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Create a PricingSheet from parsed parts (for testing)
    #[cfg(test)]
    pub fn from_parts(products: HashMap<String, ProductInfo>, bulk_rules: Vec<BulkRule>) -> Self {
        Self {
            products,
            bulk_rules,
        }
    }
}

/// Text content of a cell, trimmed. Numeric cells render without a
/// spurious trailing `.0` so quantities like `20` parse as integers.
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Empty | Data::Error(_) => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn header_index(header: &[Data], name: &str) -> Option<usize> {
    header
        .iter()
        .position(|cell| matches!(cell, Data::String(s) if s.trim() == name))
}

/// Normalize a price cell: strip the currency symbol and thousands
/// separators, then parse as a decimal amount. Unparsable prices yield
/// `None` rather than failing the row.
pub(crate) fn parse_money(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(['$', ','], "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_product_rows(rows: &[Vec<Data>]) -> Result<HashMap<String, ProductInfo>> {
    let Some((header, body)) = rows.split_first() else {
        return Err(MenuError::SheetFormat(
            "product worksheet is empty".to_string(),
        ));
    };
    let product_col = header_index(header, "Product").ok_or_else(|| {
        MenuError::SheetFormat("product worksheet has no Product column".to_string())
    })?;
    let price_col = header_index(header, "Price");
    let type_col = header_index(header, "Type");
    let bulk_col = header_index(header, "BulkPricing");

    let mut products = HashMap::new();
    for row in body {
        // Rows without a product name are spacing/notes, not products
        let Some(name) = row.get(product_col).and_then(cell_text) else {
            continue;
        };

        let price = price_col
            .and_then(|c| row.get(c))
            .and_then(cell_text)
            .and_then(|s| parse_money(&s));
        let product_type = type_col.and_then(|c| row.get(c)).and_then(cell_text);
        let bulk_pricing = bulk_col
            .and_then(|c| row.get(c))
            .and_then(cell_text)
            .and_then(|s| serde_json::from_str(&s).ok());

        products.insert(
            name,
            ProductInfo {
                price,
                product_type,
                bulk_pricing,
            },
        );
    }
    Ok(products)
}

fn parse_bulk_rules(rows: &[Vec<Data>]) -> Vec<BulkRule> {
    let Some((header, body)) = rows.split_first() else {
        return Vec::new();
    };
    let (Some(group_col), Some(qty_col), Some(price_col)) = (
        header_index(header, "ProductGroup"),
        header_index(header, "MinQty"),
        header_index(header, "Price"),
    ) else {
        log::warn!("BulkRules worksheet is missing expected columns, ignoring it");
        return Vec::new();
    };

    let mut rules = Vec::new();
    for row in body {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }

        let product_group = row.get(group_col).and_then(cell_text);
        let min_qty = row
            .get(qty_col)
            .and_then(cell_text)
            .and_then(|s| s.parse::<i64>().ok());
        let price = row
            .get(price_col)
            .and_then(cell_text)
            .and_then(|s| parse_money(&s));

        match (product_group, min_qty, price) {
            (Some(product_group), Some(min_qty), Some(price)) => {
                let rule = BulkRule {
                    product_group,
                    min_qty,
                    price,
                };
                if !rules.contains(&rule) {
                    rules.push(rule);
                }
            }
            // A partial rule is invalid, not defaulted
            _ => log::warn!("Skipping incomplete bulk rule row"),
        }
    }
    rules
}

#[cfg(test)]
#[path = "spreadsheet_tests.rs"]
mod tests;
