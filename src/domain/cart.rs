//! In-memory shopping cart.
//!
//! At most one line exists per product id; adding a product that is already
//! present bumps its quantity. Prices are captured when a product is added,
//! so later catalog price changes never touch existing lines.

use rust_decimal::Decimal;
use thiserror::Error;
use vitrina_api_types::{Product, RecordId};

use crate::domain::storefront::{PurchaseAction, purchase_action};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("product `{name}` is out of stock")]
    OutOfStock { name: String },
}

/// Snapshot of a product taken at add time.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub product_id: RecordId,
    pub name: String,
    pub unit_price: Decimal,
    pub image_url: Option<String>,
}

impl From<&Product> for CartItem {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            image_url: product.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item: CartItem,
    pub quantity: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> Decimal {
        self.item.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_to_cart(&mut self, item: impl Into<CartItem>) {
        let item = item.into();
        match self.position(item.product_id) {
            Some(index) => {
                let line = &mut self.lines[index];
                line.quantity = line.quantity.saturating_add(1);
            }
            None => self.lines.push(CartLine { item, quantity: 1 }),
        }
    }

    /// Add a catalog product, refusing ones the storefront offers only a
    /// stock notification for.
    pub fn add_product(&mut self, product: &Product) -> Result<(), CartError> {
        if purchase_action(product) != PurchaseAction::AddToCart {
            return Err(CartError::OutOfStock {
                name: product.name.clone(),
            });
        }
        self.add_to_cart(product);
        Ok(())
    }

    pub fn remove_from_cart(&mut self, product_id: RecordId) {
        self.lines.retain(|line| line.item.product_id != product_id);
    }

    /// Zero removes the line. Unknown products are ignored.
    pub fn set_quantity(&mut self, product_id: RecordId, quantity: u32) {
        if quantity == 0 {
            self.remove_from_cart(product_id);
            return;
        }
        if let Some(index) = self.position(product_id) {
            self.lines[index].quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    fn position(&self, product_id: RecordId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.item.product_id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: RecordId, price: i64, in_stock: bool) -> Product {
        Product {
            id,
            name: format!("Товар {id}"),
            category_slug: None,
            category_name: None,
            price: Decimal::new(price, 0),
            description: None,
            image_url: None,
            in_stock,
            is_active: true,
            sort_order: 0,
            sku: None,
            specifications: None,
        }
    }

    #[test]
    fn adding_twice_increments_single_line() {
        let mut cart = Cart::new();
        let p = product(1, 100, true);
        cart.add_to_cart(&p);
        cart.add_to_cart(&p);

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn totals_use_price_captured_at_add_time() {
        let mut cart = Cart::new();
        let mut p = product(1, 100, true);
        cart.add_to_cart(&p);
        p.price = Decimal::new(500, 0);
        cart.add_to_cart(&p);
        cart.add_to_cart(&product(2, 30, true));

        assert_eq!(cart.total_price(), Decimal::new(230, 0));
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn zero_quantity_removes_line() {
        let mut cart = Cart::new();
        cart.add_to_cart(&product(1, 10, true));
        cart.add_to_cart(&product(2, 10, true));
        cart.set_quantity(1, 5);
        assert_eq!(cart.item_count(), 6);

        cart.set_quantity(1, 0);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].item.product_id, 2);

        cart.set_quantity(99, 3);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn remove_and_clear() {
        let mut cart = Cart::new();
        cart.add_to_cart(&product(1, 10, true));
        cart.add_to_cart(&product(2, 10, true));
        cart.remove_from_cart(1);
        assert_eq!(cart.line_count(), 1);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Decimal::ZERO);
    }

    #[test]
    fn out_of_stock_products_are_refused() {
        let mut cart = Cart::new();
        let err = cart
            .add_product(&product(3, 10, false))
            .expect_err("out of stock");
        assert!(matches!(err, CartError::OutOfStock { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn huge_quantities_saturate_instead_of_overflowing() {
        let mut cart = Cart::new();
        let p = product(1, 1, true);
        cart.add_to_cart(&p);
        cart.add_to_cart(&product(2, 1, true));
        cart.set_quantity(1, u32::MAX);
        cart.set_quantity(2, u32::MAX);
        cart.add_to_cart(&p);

        assert_eq!(cart.lines()[0].quantity, u32::MAX);
        assert_eq!(cart.item_count(), 2 * u64::from(u32::MAX));
    }
}
