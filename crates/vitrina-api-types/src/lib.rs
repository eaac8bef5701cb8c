//! Wire shapes for the Vitrina catalog API.
//!
//! Records mirror what the read and admin endpoints return; payloads mirror
//! what the admin endpoint accepts. Responses are otherwise untyped JSON
//! objects keyed by resource name, so the envelope keys live here too.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Server-assigned record identifier.
pub type RecordId = i64;

/// Key carrying a server-side rejection message.
pub const ERROR_KEY: &str = "error";
/// Key confirming a deletion.
pub const DELETED_KEY: &str = "deleted";
/// Key confirming a settings save.
pub const SAVED_KEY: &str = "saved";
/// Key carrying a hosted asset URL in upload responses.
pub const URL_KEY: &str = "url";

/// Collections addressable through the `resource` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Categories,
    Products,
    Articles,
    Banners,
    Promotions,
    Settings,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Categories,
        Resource::Products,
        Resource::Articles,
        Resource::Banners,
        Resource::Promotions,
        Resource::Settings,
    ];

    /// Query value and plural response key.
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Categories => "categories",
            Resource::Products => "products",
            Resource::Articles => "articles",
            Resource::Banners => "banners",
            Resource::Promotions => "promotions",
            Resource::Settings => "settings",
        }
    }

    /// Response key used when a single record is returned.
    pub fn singular(self) -> &'static str {
        match self {
            Resource::Categories => "category",
            Resource::Products => "product",
            Resource::Articles => "article",
            Resource::Banners => "banner",
            Resource::Promotions => "promotion",
            Resource::Settings => "settings",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean flags that can be flipped with a single-field PATCH.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleField {
    Active,
    Published,
    InStock,
}

impl ToggleField {
    pub fn as_str(self) -> &'static str {
        match self {
            ToggleField::Active => "is_active",
            ToggleField::Published => "is_published",
            ToggleField::InStock => "in_stock",
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: RecordId,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Computed server-side; never written back.
    #[serde(default)]
    pub product_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub category_slug: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    /// Arrives as a decimal string or a number depending on the endpoint.
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub sku: Option<String>,
    /// Free-form attribute table shown on the product card.
    #[serde(default)]
    pub specifications: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: RecordId,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub read_time: String,
    #[serde(default = "default_true")]
    pub is_published: bool,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub badge: String,
    #[serde(default)]
    pub button_text: String,
    #[serde(default)]
    pub button_url: String,
    #[serde(default)]
    pub gradient: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub badge: String,
    #[serde(default)]
    pub badge_value: String,
    #[serde(default)]
    pub button_text: String,
    #[serde(default)]
    pub button_url: String,
    /// Display label, not a structured date.
    #[serde(default)]
    pub expires_at: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

/// Visual theme tokens offered for banners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BannerGradient {
    #[default]
    Gray,
    Green,
    Blue,
    Red,
    Purple,
    Orange,
}

impl BannerGradient {
    pub const ALL: [BannerGradient; 6] = [
        BannerGradient::Gray,
        BannerGradient::Green,
        BannerGradient::Blue,
        BannerGradient::Red,
        BannerGradient::Purple,
        BannerGradient::Orange,
    ];

    pub fn token(self) -> &'static str {
        match self {
            BannerGradient::Gray => "from-secondary/95 to-muted/90",
            BannerGradient::Green => "from-green-600/90 to-green-500/70",
            BannerGradient::Blue => "from-blue-700/90 to-blue-500/70",
            BannerGradient::Red => "from-red-600/90 to-red-500/70",
            BannerGradient::Purple => "from-purple-700/90 to-purple-500/70",
            BannerGradient::Orange => "from-orange-600/90 to-orange-400/70",
        }
    }

    /// Unknown tokens resolve to the neutral theme.
    pub fn from_token(token: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|gradient| gradient.token() == token)
            .unwrap_or_default()
    }
}

impl From<String> for BannerGradient {
    fn from(value: String) -> Self {
        Self::from_token(&value)
    }
}

impl From<BannerGradient> for String {
    fn from(value: BannerGradient) -> Self {
        value.token().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPayload {
    pub slug: String,
    pub name: String,
    pub icon: String,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPayload {
    pub name: String,
    pub category_slug: Option<String>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub in_stock: bool,
    pub is_active: bool,
    pub sort_order: i32,
    pub sku: Option<String>,
    /// Replaced wholesale on every write.
    pub specifications: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticlePayload {
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub category: String,
    pub read_time: String,
    pub is_published: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BannerPayload {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub badge: String,
    pub button_text: String,
    pub button_url: String,
    pub gradient: BannerGradient,
    pub is_active: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromotionPayload {
    pub title: String,
    pub description: Option<String>,
    pub badge: String,
    pub badge_value: String,
    pub button_text: String,
    pub button_url: String,
    pub expires_at: String,
    pub is_active: bool,
    pub sort_order: i32,
}

/// Body accepted by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadRequest {
    /// Data URL (`data:<type>;base64,<payload>`).
    pub file: String,
    pub content_type: String,
    pub folder: String,
}

/// One stored contact setting as returned by the admin endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingEntry {
    pub value: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsSaveRequest {
    pub settings: BTreeMap<String, String>,
}

/// Body accepted by the stock-notification endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockNotifyRequest {
    #[serde(rename = "productName")]
    pub product_name: String,
    pub email: String,
    pub phone: String,
}
