use poscore::pos::pricebook::PricebookRow;
use poscore::pos::{Cart, CartItem, CartTotals, Pricebook, Product};
use poscore::session::SessionStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct UploadRequest {
    pub rows: Vec<PricebookRow>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct QuantityUpdate {
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricebookListing {
    pub items: Vec<Product>,
    pub count: usize,
}

impl From<&Pricebook> for PricebookListing {
    fn from(pricebook: &Pricebook) -> Self {
        Self {
            items: pricebook.items(),
            count: pricebook.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().to_vec(),
            totals: cart.totals(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScannerView {
    pub scanning: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
