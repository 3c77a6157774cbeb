//! Register domain: pricebook, cart and payment.

pub mod cart;
pub mod manual;
pub mod money;
pub mod payment;
pub mod pricebook;

pub use cart::{Cart, CartItem, CartTotals, DEFAULT_TAX_RATE, MAX_LINE_QUANTITY};
pub use manual::ManualEntry;
pub use money::Money;
pub use payment::{settle, PaymentMethod, Receipt};
pub use pricebook::{Pricebook, Product, UploadReport};
