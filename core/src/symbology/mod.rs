//! Barcode symbology helpers: UPC-E expansion and check digits.

pub mod barcode;
pub mod upc;

pub use barcode::CanonicalBarcode;
