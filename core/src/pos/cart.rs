use crate::pos::money::Money;
use crate::pos::pricebook::Product;
use crate::prelude::{PosError, PosResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TAX_RATE: f64 = 0.0825;
/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: u32 = 999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub barcode: String,
    pub name: String,
    #[serde(rename = "price_cents")]
    pub price: Money,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CartTotals {
    #[serde(rename = "subtotal_cents")]
    pub subtotal: Money,
    #[serde(rename = "tax_cents")]
    pub tax: Money,
    #[serde(rename = "total_cents")]
    pub total: Money,
    pub item_count: u32,
    pub tax_rate: f64,
}

/// Items of the sale in progress, in the order they were first scanned.
#[derive(Debug, Clone)]
pub struct Cart {
    items: Vec<CartItem>,
    tax_rate: f64,
    next_line: u64,
}

impl Default for Cart {
    fn default() -> Self {
        Self::with_tax_rate(DEFAULT_TAX_RATE)
    }
}

impl Cart {
    pub fn with_tax_rate(tax_rate: f64) -> Self {
        Self {
            items: Vec::new(),
            tax_rate,
            next_line: 1,
        }
    }

    /// Adds one unit; a barcode already in the cart bumps its quantity.
    pub fn add(&mut self, product: &Product) -> CartItem {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.barcode == product.barcode)
        {
            item.quantity = item.quantity.saturating_add(1).min(MAX_LINE_QUANTITY);
            return item.clone();
        }

        let item = CartItem {
            id: format!("{}-{}", product.barcode, self.next_line),
            barcode: product.barcode.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity: 1,
        };
        self.next_line += 1;
        self.items.push(item.clone());
        item
    }

    /// Sets the quantity of a line; zero removes it. Returns the updated line.
    pub fn update_quantity(&mut self, id: &str, quantity: u32) -> PosResult<Option<CartItem>> {
        if quantity == 0 {
            self.remove(id)?;
            return Ok(None);
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(PosError::InvalidInput(format!(
                "quantity {} exceeds {}",
                quantity, MAX_LINE_QUANTITY
            )));
        }
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| PosError::NotFound(format!("cart item {}", id)))?;
        item.quantity = quantity;
        Ok(Some(item.clone()))
    }

    pub fn remove(&mut self, id: &str) -> PosResult<CartItem> {
        let position = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| PosError::NotFound(format!("cart item {}", id)))?;
        Ok(self.items.remove(position))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    pub fn totals(&self) -> CartTotals {
        let subtotal: Money = self.items.iter().map(CartItem::line_total).sum();
        let tax = subtotal.apply_rate(self.tax_rate);
        CartTotals {
            subtotal,
            tax,
            total: subtotal + tax,
            item_count: self
                .items
                .iter()
                .fold(0u32, |count, item| count.saturating_add(item.quantity)),
            tax_rate: self.tax_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(barcode: &str, cents: u64) -> Product {
        Product {
            barcode: barcode.into(),
            name: format!("item {}", barcode),
            price: Money::from_cents(cents),
            category: None,
        }
    }

    #[test]
    fn quantity_above_cap_is_refused() {
        let mut cart = Cart::default();
        let id = cart.add(&product("1", 250)).id;
        let err = cart.update_quantity(&id, u32::MAX).unwrap_err();
        assert!(matches!(err, PosError::InvalidInput(_)));
        assert_eq!(cart.items()[0].quantity, 1);

        let line = cart.update_quantity(&id, MAX_LINE_QUANTITY).unwrap().unwrap();
        assert_eq!(line.quantity, MAX_LINE_QUANTITY);
        assert_eq!(cart.add(&product("1", 250)).quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn full_lines_total_without_overflow() {
        let mut cart = Cart::default();
        let first = cart.add(&product("1", u64::MAX / 2)).id;
        let second = cart.add(&product("2", u64::MAX / 2)).id;
        cart.update_quantity(&first, MAX_LINE_QUANTITY).unwrap();
        cart.update_quantity(&second, MAX_LINE_QUANTITY).unwrap();

        let totals = cart.totals();
        assert_eq!(totals.item_count, 2 * MAX_LINE_QUANTITY);
        assert_eq!(totals.subtotal, Money::from_cents(u64::MAX));
        assert_eq!(totals.total, Money::from_cents(u64::MAX));
    }

    #[test]
    fn repeated_scan_increments_quantity() {
        let mut cart = Cart::default();
        let first = cart.add(&product("1", 250));
        let second = cart.add(&product("1", 250));
        assert_eq!(first.id, second.id);
        assert_eq!(second.quantity, 2);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn totals_apply_tax_to_subtotal() {
        let mut cart = Cart::default();
        cart.add(&product("1", 250));
        cart.add(&product("1", 250));
        cart.add(&product("2", 199));

        let totals = cart.totals();
        assert_eq!(totals.subtotal, Money::from_cents(699));
        assert_eq!(totals.tax, Money::from_cents(58));
        assert_eq!(totals.total, Money::from_cents(757));
        assert_eq!(totals.item_count, 3);
    }

    #[test]
    fn zero_quantity_removes_line() {
        let mut cart = Cart::default();
        let item = cart.add(&product("1", 100));
        assert_eq!(cart.update_quantity(&item.id, 4).unwrap().unwrap().quantity, 4);
        assert_eq!(cart.update_quantity(&item.id, 0).unwrap(), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn unknown_line_is_not_found() {
        let mut cart = Cart::default();
        assert!(matches!(cart.remove("nope"), Err(PosError::NotFound(_))));
        assert!(cart.update_quantity("nope", 2).is_err());
    }

    #[test]
    fn line_ids_stay_unique_after_removal() {
        let mut cart = Cart::default();
        let a = cart.add(&product("1", 100));
        cart.remove(&a.id).unwrap();
        let b = cart.add(&product("1", 100));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn empty_cart_totals_are_zero() {
        let totals = Cart::with_tax_rate(0.1).totals();
        assert_eq!(totals.total, Money::ZERO);
        assert_eq!(totals.item_count, 0);
    }
}
