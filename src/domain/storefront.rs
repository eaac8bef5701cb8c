//! Rules the storefront applies when presenting catalog products.

use vitrina_api_types::{Product, StockNotifyRequest};

use crate::domain::error::ValidationError;

/// The single purchase-related action a product card offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseAction {
    AddToCart,
    /// Out of stock: collect contact details for a restock notice instead.
    NotifyMe,
}

/// Stock decides the action; `is_active` only decides visibility.
pub fn purchase_action(product: &Product) -> PurchaseAction {
    if product.in_stock {
        PurchaseAction::AddToCart
    } else {
        PurchaseAction::NotifyMe
    }
}

/// Build a restock notice. Product name and email are required; the phone
/// is optional.
pub fn stock_notify_request(
    product_name: &str,
    email: &str,
    phone: &str,
) -> Result<StockNotifyRequest, ValidationError> {
    let product_name = product_name.trim();
    if product_name.is_empty() {
        return Err(ValidationError::required("product_name"));
    }
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::new("email", "Enter an email address"));
    }
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err(ValidationError::new("email", "Enter a valid email address"));
    }
    Ok(StockNotifyRequest {
        product_name: product_name.to_string(),
        email: email.to_string(),
        phone: phone.trim().to_string(),
    })
}
