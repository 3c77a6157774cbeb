use crate::pos::money::Money;
use crate::pos::pricebook::Product;
use crate::prelude::{PosError, PosResult};
use serde::{Deserialize, Serialize};

const DEFAULT_NAME: &str = "Kitchen Item";

/// Operator-keyed item for codes missing from the pricebook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualEntry {
    #[serde(default)]
    pub name: Option<String>,
    /// Price as typed on the keypad, e.g. `"4.50"`.
    pub price: String,
    #[serde(default)]
    pub barcode: Option<String>,
}

impl ManualEntry {
    /// `fallback_barcode` is usually the code that just missed the lookup.
    pub fn into_product(
        self,
        fallback_barcode: Option<&str>,
        now_millis: u128,
    ) -> PosResult<Product> {
        let price = Money::parse(&self.price)
            .filter(|price| !price.is_zero())
            .ok_or_else(|| PosError::InvalidInput("Enter a price".into()))?;

        let name = self
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        let barcode = self
            .barcode
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
            .or_else(|| fallback_barcode.map(str::to_string))
            .unwrap_or_else(|| format!("MANUAL-{}", now_millis));

        Ok(Product {
            barcode,
            name,
            price,
            category: None,
        })
    }
}
