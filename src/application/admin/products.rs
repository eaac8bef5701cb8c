use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vitrina_api_types::{Product, ProductPayload, RecordId, Resource, ToggleField};

use crate::application::admin::panel::{ResourceKind, optional_text};
use crate::domain::error::{ValidationError, ensure_non_empty};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDraft {
    pub name: String,
    /// Empty means "no category".
    pub category_slug: String,
    /// Kept as typed so a half-entered value survives a failed save.
    pub price: String,
    pub description: String,
    pub image_url: String,
    pub in_stock: bool,
    pub is_active: bool,
    pub sort_order: i32,
    pub sku: String,
    pub specifications: BTreeMap<String, String>,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            category_slug: String::new(),
            price: String::new(),
            description: String::new(),
            image_url: String::new(),
            in_stock: true,
            is_active: true,
            sort_order: 0,
            sku: String::new(),
            specifications: BTreeMap::new(),
        }
    }
}

/// Parse a price as an operator types it; `,` is accepted as the decimal
/// separator and the result must be strictly positive.
pub fn parse_price(raw: &str) -> Result<Decimal, ValidationError> {
    let normalized = raw.trim().replace(',', ".").replace(' ', "");
    let price = Decimal::from_str(&normalized)
        .map_err(|_| ValidationError::new("price", "Enter a valid price"))?;
    if price <= Decimal::ZERO {
        return Err(ValidationError::new("price", "Price must be greater than zero"));
    }
    Ok(price)
}

pub struct ProductKind;

impl ResourceKind for ProductKind {
    type Record = Product;
    type Draft = ProductDraft;
    type Payload = ProductPayload;

    const RESOURCE: Resource = Resource::Products;
    const LABEL: &'static str = "Product";
    const UPLOAD_FOLDER: Option<&'static str> = Some("products");

    fn id(record: &Product) -> RecordId {
        record.id
    }

    fn title(record: &Product) -> &str {
        &record.name
    }

    fn draft_from(record: &Product) -> ProductDraft {
        ProductDraft {
            name: record.name.clone(),
            category_slug: record.category_slug.clone().unwrap_or_default(),
            price: record.price.normalize().to_string(),
            description: record.description.clone().unwrap_or_default(),
            image_url: record.image_url.clone().unwrap_or_default(),
            in_stock: record.in_stock,
            is_active: record.is_active,
            sort_order: record.sort_order,
            sku: record.sku.clone().unwrap_or_default(),
            specifications: record.specifications.clone().unwrap_or_default(),
        }
    }

    fn payload(draft: &ProductDraft) -> Result<ProductPayload, ValidationError> {
        ensure_non_empty(&draft.name, "name")
            .map_err(|_| ValidationError::new("name", "Enter the product name"))?;
        let price = parse_price(&draft.price)?;
        Ok(ProductPayload {
            name: draft.name.trim().to_string(),
            category_slug: optional_text(&draft.category_slug),
            price,
            description: optional_text(&draft.description),
            image_url: optional_text(&draft.image_url),
            in_stock: draft.in_stock,
            is_active: draft.is_active,
            sort_order: draft.sort_order,
            sku: optional_text(&draft.sku),
            specifications: draft.specifications.clone(),
        })
    }

    fn flag(record: &Product, field: ToggleField) -> Option<bool> {
        match field {
            ToggleField::Active => Some(record.is_active),
            ToggleField::InStock => Some(record.in_stock),
            ToggleField::Published => None,
        }
    }

    fn image_slot(draft: &mut ProductDraft) -> Option<&mut String> {
        Some(&mut draft.image_url)
    }

    fn retitle(draft: &mut ProductDraft, title: &str, _creating: bool) {
        draft.name = title.to_string();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::Method;
    use serde_json::json;

    use super::*;
    use crate::application::admin::panel::ResourcePanel;
    use crate::application::testing::{RecordingUi, ScriptedTransport};
    use crate::application::transport::{AdminKey, Gateway};

    #[test]
    fn price_accepts_comma_and_rejects_zero() {
        assert_eq!(parse_price("1 250,50").expect("price"), Decimal::new(125050, 2));
        assert_eq!(parse_price("0").unwrap_err().message, "Price must be greater than zero");
        assert_eq!(parse_price("-3").unwrap_err().field, "price");
        assert_eq!(parse_price("дорого").unwrap_err().message, "Enter a valid price");
        assert!(parse_price("").is_err());
    }

    #[test]
    fn blank_category_means_none() {
        let draft = ProductDraft {
            name: "Нитки мулине".into(),
            price: "89.90".into(),
            category_slug: "  ".into(),
            ..ProductDraft::default()
        };
        let payload = ProductKind::payload(&draft).expect("payload");
        assert_eq!(payload.category_slug, None);
        assert_eq!(payload.price, Decimal::new(8990, 2));
    }

    #[test]
    fn in_stock_and_active_are_independent_flags() {
        let product: Product = serde_json::from_value(json!({
            "id": 5, "name": "Спицы", "price": 300, "in_stock": false, "is_active": true
        }))
        .expect("product");
        assert_eq!(ProductKind::flag(&product, ToggleField::InStock), Some(false));
        assert_eq!(ProductKind::flag(&product, ToggleField::Active), Some(true));
        assert_eq!(ProductKind::flag(&product, ToggleField::Published), None);
    }

    #[tokio::test]
    async fn bad_price_makes_no_calls() {
        let transport = Arc::new(ScriptedTransport::new());
        let ui = Arc::new(RecordingUi::default());
        let gateway = Gateway::new(transport.clone(), AdminKey::new("secret").expect("key"));
        let mut panel = ResourcePanel::<ProductKind>::new(gateway, ui.clone());

        panel.set_title("Пяльцы");
        panel.draft_mut().price = "0".into();
        assert!(panel.save().await.is_err());
        panel.draft_mut().price = "abc".into();
        assert!(panel.save().await.is_err());

        assert_eq!(transport.call_count(), 0);
        assert_eq!(ui.errors().len(), 2);
    }

    #[tokio::test]
    async fn created_product_is_posted_with_numeric_price() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .respond(json!({"product": {"id": 11}}))
            .respond(json!({"products": [{"id": 11, "name": "Пяльцы", "price": "450.00"}]}));
        let ui = Arc::new(RecordingUi::default());
        let gateway = Gateway::new(transport.clone(), AdminKey::new("secret").expect("key"));
        let mut panel = ResourcePanel::<ProductKind>::new(gateway, ui.clone());

        panel.set_title("Пяльцы");
        panel.draft_mut().price = "450".into();
        panel.save().await.expect("save");

        let calls = transport.calls();
        assert_eq!(calls[0].method, Method::POST);
        assert_eq!(calls[0].id, None);
        let body = calls[0].body.as_ref().expect("body");
        assert_eq!(body["price"], json!(450.0));
        assert_eq!(panel.records().len(), 1);
        assert_eq!(panel.draft(), &ProductDraft::default());
    }

    #[tokio::test]
    async fn editing_keeps_sku_and_specifications() {
        let listed = json!({"products": [{
            "id": 3, "name": "Спицы", "price": "300.00", "sort_order": 3,
            "sku": "SP-300", "specifications": {"Длина": "40 см"}
        }]});
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .respond(listed.clone())
            .respond(json!({"product": {"id": 3}}))
            .respond(listed);
        let ui = Arc::new(RecordingUi::default());
        let gateway = Gateway::new(transport.clone(), AdminKey::new("secret").expect("key"));
        let mut panel = ResourcePanel::<ProductKind>::new(gateway, ui.clone());

        panel.reload().await.expect("reload");
        panel.start_edit(3).expect("edit");
        assert_eq!(panel.draft().sku, "SP-300");
        panel.save().await.expect("save");

        let calls = transport.calls();
        assert_eq!(calls[1].method, Method::PUT);
        assert_eq!(calls[1].id, Some(3));
        let body = calls[1].body.as_ref().expect("body");
        assert_eq!(body["sku"], json!("SP-300"));
        assert_eq!(body["specifications"], json!({"Длина": "40 см"}));
        assert_eq!(body["price"], json!(300.0));
    }

    #[test]
    fn blank_sku_is_sent_as_null() {
        let draft = ProductDraft {
            name: "Пяльцы".into(),
            price: "450".into(),
            sku: "   ".into(),
            ..ProductDraft::default()
        };
        let payload = ProductKind::payload(&draft).expect("payload");
        assert_eq!(payload.sku, None);
        assert!(payload.specifications.is_empty());
    }
}
