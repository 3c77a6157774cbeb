use crate::symbology::upc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized barcode forwarded to the register.
///
/// Short UPC-E reads are expanded to UPC-A; every other symbology passes
/// through as decoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalBarcode(String);

impl CanonicalBarcode {
    pub fn from_decoded(raw: &str) -> Self {
        Self(upc::convert(raw.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_upc_a(&self) -> bool {
        upc::is_valid_upc_a(&self.0)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalBarcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalBarcode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upc_e_reads_are_expanded() {
        let code = CanonicalBarcode::from_decoded("01234565");
        assert_eq!(code.as_str(), "012345000065");
        assert!(code.is_upc_a());
    }

    #[test]
    fn ean13_passes_through() {
        let code = CanonicalBarcode::from_decoded("4006381333931");
        assert_eq!(code.as_str(), "4006381333931");
        assert!(!code.is_upc_a());
    }

    #[test]
    fn serializes_as_plain_string() {
        let code = CanonicalBarcode::from_decoded("036000291452");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"036000291452\"");
    }
}
