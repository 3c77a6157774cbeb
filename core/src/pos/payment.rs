use crate::pos::cart::{CartItem, CartTotals};
use crate::pos::money::Money;
use crate::prelude::{PosError, PosResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash {
        #[serde(rename = "tendered_cents")]
        tendered: Money,
    },
    Card,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub method: PaymentMethod,
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
    #[serde(rename = "change_cents", skip_serializing_if = "Option::is_none")]
    pub change: Option<Money>,
}

/// Settles the sale. Cash must cover the total; card always clears.
pub fn settle(items: &[CartItem], totals: CartTotals, method: PaymentMethod) -> PosResult<Receipt> {
    if items.is_empty() {
        return Err(PosError::EmptyCart);
    }

    let change = match method {
        PaymentMethod::Cash { tendered } => Some(tendered.checked_sub(totals.total).ok_or(
            PosError::InsufficientTender {
                tendered,
                total: totals.total,
            },
        )?),
        PaymentMethod::Card => None,
    };

    Ok(Receipt {
        method,
        items: items.to_vec(),
        totals,
        change,
    })
}
