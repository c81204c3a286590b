//! Tests for pricing spreadsheet parsing.

use super::{parse_bulk_rules, parse_money, parse_product_rows, PricingSheet};
use crate::error::MenuError;
use calamine::Data;

fn s(text: &str) -> Data {
    Data::String(text.to_string())
}

fn product_header() -> Vec<Data> {
    vec![s("Product"), s("Price"), s("Type"), s("BulkPricing")]
}

// ── parse_money ──────────────────────────────────────────────────────

#[test]
fn parse_money_strips_currency_symbol_and_separators() {
    assert_eq!(parse_money("$45.00"), Some(45.0));
    assert_eq!(parse_money("1,250.50"), Some(1250.5));
    assert_eq!(parse_money(" $1,000 "), Some(1000.0));
}

#[test]
fn parse_money_rejects_garbage() {
    assert_eq!(parse_money(""), None);
    assert_eq!(parse_money("call for price"), None);
    assert_eq!(parse_money("$"), None);
}

// ── product table ────────────────────────────────────────────────────

#[test]
fn product_rows_become_a_lookup_by_trimmed_name() {
    let rows = vec![
        product_header(),
        vec![s(" Blue Dream 3.5g "), s("$45.00"), s("Flower"), Data::Empty],
        vec![s("Sour Diesel 1g"), s("15"), s(" Preroll "), Data::Empty],
    ];

    let products = parse_product_rows(&rows).unwrap();
    assert_eq!(products.len(), 2);

    let info = &products["Blue Dream 3.5g"];
    assert_eq!(info.price, Some(45.0));
    assert_eq!(info.product_type.as_deref(), Some("Flower"));
    assert_eq!(info.bulk_pricing, None);

    assert_eq!(products["Sour Diesel 1g"].product_type.as_deref(), Some("Preroll"));
}

#[test]
fn rows_without_a_product_name_are_skipped() {
    let rows = vec![
        product_header(),
        vec![Data::Empty, s("$10"), s("Flower"), Data::Empty],
        vec![s("   "), s("$10"), s("Flower"), Data::Empty],
        vec![s("Real Product"), s("$10"), s("Flower"), Data::Empty],
    ];

    let products = parse_product_rows(&rows).unwrap();
    assert_eq!(products.len(), 1);
    assert!(products.contains_key("Real Product"));
}

#[test]
fn unparsable_price_yields_null_not_an_error() {
    let rows = vec![
        product_header(),
        vec![s("Mystery Jar"), s("ask budtender"), Data::Empty, Data::Empty],
    ];

    let products = parse_product_rows(&rows).unwrap();
    let info = &products["Mystery Jar"];
    assert_eq!(info.price, None);
    assert_eq!(info.product_type, None);
}

#[test]
fn numeric_price_cells_are_accepted() {
    let rows = vec![
        product_header(),
        vec![s("Gummies 100mg"), Data::Float(25.0), s("Edible"), Data::Empty],
    ];

    let products = parse_product_rows(&rows).unwrap();
    assert_eq!(products["Gummies 100mg"].price, Some(25.0));
}

#[test]
fn bulk_pricing_cell_is_parsed_as_embedded_json() {
    let rows = vec![
        product_header(),
        vec![
            s("Blue Dream 3.5g"),
            s("$45.00"),
            s("Flower"),
            s(r#"{"group":"flower-eighths","tiers":[{"qty":2,"price":80.0}]}"#),
        ],
        vec![s("Bad Json"), s("$10"), s("Flower"), s("{not json")],
    ];

    let products = parse_product_rows(&rows).unwrap();
    let bulk = products["Blue Dream 3.5g"].bulk_pricing.as_ref().unwrap();
    assert_eq!(bulk["group"], "flower-eighths");
    assert_eq!(products["Bad Json"].bulk_pricing, None);
}

#[test]
fn missing_product_column_is_fatal() {
    let rows = vec![vec![s("Name"), s("Price")]];
    match parse_product_rows(&rows) {
        Err(MenuError::SheetFormat(msg)) => assert!(msg.contains("Product")),
        other => panic!("Expected SheetFormat error, got: {other:?}"),
    }
}

#[test]
fn empty_worksheet_is_fatal() {
    assert!(matches!(
        parse_product_rows(&[]),
        Err(MenuError::SheetFormat(_))
    ));
}

// ── bulk rules ───────────────────────────────────────────────────────

fn bulk_header() -> Vec<Data> {
    vec![s("ProductGroup"), s("MinQty"), s("Price")]
}

#[test]
fn complete_rules_are_kept() {
    let rows = vec![
        bulk_header(),
        vec![s("flower-eighths"), s("2"), s("$80.00")],
        vec![s("prerolls"), Data::Float(5.0), Data::Float(50.0)],
    ];

    let rules = parse_bulk_rules(&rows);
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].product_group, "flower-eighths");
    assert_eq!(rules[0].min_qty, 2);
    assert_eq!(rules[0].price, 80.0);
    assert_eq!(rules[1].min_qty, 5);
}

#[test]
fn partial_rules_are_dropped_entirely() {
    let rows = vec![
        bulk_header(),
        vec![s("flower-eighths"), Data::Empty, s("$80.00")],
        vec![Data::Empty, s("2"), s("$80.00")],
        vec![s("prerolls"), s("not a number"), s("$50.00")],
        vec![s("prerolls"), s("5"), s("n/a")],
    ];

    assert!(parse_bulk_rules(&rows).is_empty());
}

#[test]
fn duplicate_rules_are_deduplicated() {
    let rows = vec![
        bulk_header(),
        vec![s("flower-eighths"), s("2"), s("$80.00")],
        vec![s("flower-eighths"), s("2"), s("$80.00")],
    ];

    assert_eq!(parse_bulk_rules(&rows).len(), 1);
}

#[test]
fn missing_columns_ignore_the_whole_sheet() {
    let rows = vec![
        vec![s("ProductGroup"), s("Qty")],
        vec![s("flower-eighths"), s("2")],
    ];

    assert!(parse_bulk_rules(&rows).is_empty());
}

// ── workbook-level failure policy ────────────────────────────────────

#[test]
fn missing_workbook_is_fatal() {
    let result = PricingSheet::load(std::path::Path::new("/nonexistent/pricing.xlsx"));
    assert!(result.is_err());
}

#[test]
fn lookup_is_by_exact_trimmed_name() {
    let rows = vec![product_header(), vec![s("Blue Dream 3.5g"), s("$45"), s("Flower"), Data::Empty]];
    let sheet = PricingSheet::from_parts(parse_product_rows(&rows).unwrap(), Vec::new());

    assert!(sheet.get(" Blue Dream 3.5g ").is_some());
    assert!(sheet.get("blue dream 3.5g").is_none());
    assert!(sheet.get("Unknown Item").is_none());
}
