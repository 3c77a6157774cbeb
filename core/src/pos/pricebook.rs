use crate::pos::money::Money;
use crate::prelude::{PosError, PosResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One spreadsheet row keyed by its header cells.
pub type PricebookRow = Map<String, Value>;

const BARCODE_COLUMNS: &[&str] = &["barcode", "upc", "ean", "scan", "code"];
const NAME_COLUMNS: &[&str] = &["name", "product", "description", "item"];
const PRICE_COLUMNS: &[&str] = &["price", "retail", "cost", "amount"];
const MAX_REPORTED_ERRORS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub barcode: String,
    pub name: String,
    #[serde(rename = "price_cents")]
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Outcome of a pricebook upload, shaped for the HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    pub success: bool,
    pub message: String,
    pub item_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// In-memory barcode → product table.
#[derive(Debug, Clone, Default)]
pub struct Pricebook {
    items: HashMap<String, Product>,
}

impl Pricebook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, barcode: &str) -> PosResult<&Product> {
        self.items
            .get(barcode.trim())
            .ok_or_else(|| PosError::NotFound(format!("barcode {} not in pricebook", barcode)))
    }

    /// All products ordered by barcode.
    pub fn items(&self) -> Vec<Product> {
        let mut items: Vec<Product> = self.items.values().cloned().collect();
        items.sort_by(|a, b| a.barcode.cmp(&b.barcode));
        items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replaces the whole table; a later duplicate barcode wins.
    pub fn replace(&mut self, products: Vec<Product>) {
        self.items = products
            .into_iter()
            .map(|product| (product.barcode.clone(), product))
            .collect();
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Parses uploaded rows and swaps them in when at least one is usable.
    /// A failed upload leaves the current table untouched.
    pub fn import(&mut self, rows: &[PricebookRow]) -> UploadReport {
        if rows.is_empty() {
            return UploadReport {
                success: false,
                message: "File is empty or invalid format".into(),
                item_count: 0,
                errors: None,
            };
        }

        let (products, errors) = parse_rows(rows);
        let reported = if errors.is_empty() {
            None
        } else {
            Some(errors.into_iter().take(MAX_REPORTED_ERRORS).collect())
        };

        if products.is_empty() {
            return UploadReport {
                success: false,
                message: "No valid products found in file".into(),
                item_count: 0,
                errors: reported,
            };
        }

        let item_count = products.len();
        self.replace(products);
        UploadReport {
            success: true,
            message: format!("Successfully uploaded {} items", item_count),
            item_count,
            errors: reported,
        }
    }
}

/// Converts rows into products, collecting a message per rejected row.
/// Row numbers count the header line, matching what the operator sees in
/// the spreadsheet.
pub fn parse_rows(rows: &[PricebookRow]) -> (Vec<Product>, Vec<String>) {
    let mut products = Vec::new();
    let mut errors = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        let line = idx + 2;
        match parse_row(row) {
            Ok(product) => products.push(product),
            Err(RowError::MissingColumns) => errors.push(format!(
                "Row {}: Missing required columns (barcode, name, price)",
                line
            )),
            Err(RowError::InvalidData) => errors.push(format!("Row {}: Invalid data", line)),
        }
    }

    (products, errors)
}

enum RowError {
    MissingColumns,
    InvalidData,
}

fn parse_row(row: &PricebookRow) -> Result<Product, RowError> {
    let barcode_key = find_column(row, BARCODE_COLUMNS, &[]).ok_or(RowError::MissingColumns)?;
    let name_key = find_column(row, NAME_COLUMNS, &[barcode_key]).ok_or(RowError::MissingColumns)?;
    let price_key = find_column(row, PRICE_COLUMNS, &[barcode_key, name_key])
        .ok_or(RowError::MissingColumns)?;

    let mut barcode = cell_text(&row[barcode_key]);
    if is_placeholder_code(&barcode) {
        // vendor exports leave the scan code blank and carry an item code
        if let Some(fallback) = find_column(row, &["code"], &[barcode_key, name_key, price_key]) {
            barcode = cell_text(&row[fallback]);
        }
    }
    let name = cell_text(&row[name_key]);
    let price = cell_price(&row[price_key]);

    match price {
        Some(price) if !is_placeholder_code(&barcode) && !name.is_empty() && !price.is_zero() => {
            Ok(Product {
                barcode,
                name,
                price,
                category: find_column(row, &["category", "department"], &[])
                    .map(|key| cell_text(&row[key]))
                    .filter(|category| !category.is_empty()),
            })
        }
        _ => Err(RowError::InvalidData),
    }
}

/// First header containing one of `patterns`, tried in pattern order.
fn find_column<'a>(
    row: &'a PricebookRow,
    patterns: &[&str],
    taken: &[&'a str],
) -> Option<&'a str> {
    patterns.iter().find_map(|pattern| {
        row.keys()
            .map(String::as_str)
            .filter(|key| !taken.contains(key))
            .find(|key| key.to_lowercase().contains(pattern))
    })
}

fn is_placeholder_code(code: &str) -> bool {
    code.is_empty() || code == "." || code == "0"
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    }
}

fn cell_price(value: &Value) -> Option<Money> {
    match value {
        Value::Number(number) => number.as_f64().and_then(Money::from_dollars),
        Value::String(text) => Money::parse(text),
        _ => None,
    }
}
