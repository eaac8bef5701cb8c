#![deny(clippy::all, clippy::pedantic)]

use serde_json::{Value, json};
use vitrina::domain::cart::Cart;
use vitrina::domain::storefront::{PurchaseAction, purchase_action};
use vitrina_api_types::{Product, RecordId};

use crate::args::CatalogCmd;
use crate::client::{CliError, Ctx};
use crate::print::{print_json, to_value};

pub async fn handle(ctx: &Ctx, cmd: &CatalogCmd) -> Result<(), CliError> {
    let catalog = ctx.catalog()?;
    let output = match cmd {
        CatalogCmd::Categories => to_value(catalog.categories().await?)?,
        CatalogCmd::Products { category, search } => {
            let products = catalog
                .products(category.as_deref(), search.as_deref())
                .await?;
            products_with_actions(&products)
        }
        CatalogCmd::Articles => to_value(catalog.articles().await?)?,
        CatalogCmd::Article { id } => to_value(catalog.article(*id).await?)?,
        CatalogCmd::Banners => to_value(catalog.banners().await?)?,
        CatalogCmd::Contacts => to_value(catalog.contacts().await?)?,
        CatalogCmd::Quote { ids } => {
            let products = catalog.products(None, None).await?;
            quote(&products, ids)?
        }
    };
    print_json(&output)
}

fn products_with_actions(products: &[Product]) -> Value {
    let rows: Vec<Value> = products
        .iter()
        .map(|product| {
            let action = match purchase_action(product) {
                PurchaseAction::AddToCart => "add_to_cart",
                PurchaseAction::NotifyMe => "notify_me",
            };
            json!({
                "id": product.id,
                "name": product.name,
                "category": product.category_name,
                "price": product.price.to_string(),
                "action": action,
            })
        })
        .collect();
    Value::Array(rows)
}

/// Price a cart built by adding each id in order.
pub fn quote(products: &[Product], ids: &[RecordId]) -> Result<Value, CliError> {
    let mut cart = Cart::new();
    for id in ids {
        let product = products
            .iter()
            .find(|product| product.id == *id)
            .ok_or_else(|| CliError::InvalidInput(format!("no active product with id {id}")))?;
        cart.add_product(product)?;
    }
    let lines: Vec<Value> = cart
        .lines()
        .iter()
        .map(|line| {
            json!({
                "product_id": line.item.product_id,
                "name": line.item.name,
                "unit_price": line.item.unit_price.to_string(),
                "quantity": line.quantity,
                "subtotal": line.subtotal().to_string(),
            })
        })
        .collect();
    Ok(json!({
        "lines": lines,
        "items": cart.item_count(),
        "total": cart.total_price().to_string(),
    }))
}
