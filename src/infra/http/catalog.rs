//! Unauthenticated reads of the public catalog endpoint.

use std::collections::BTreeMap;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;
use vitrina_api_types::{
    Article, Banner, Category, ERROR_KEY, Product, RecordId, Resource, SettingEntry,
};

use super::resource_url;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("catalog returned {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Clone, Debug)]
pub struct CatalogClient {
    client: Client,
    base: Url,
}

impl CatalogClient {
    pub fn new(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    /// Active categories with their product counts.
    pub async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        let body = self.fetch(Resource::Categories, &[]).await?;
        field(&body, Resource::Categories.as_str())
    }

    /// Active products, optionally narrowed to one category slug and a name
    /// search.
    pub async fn products(
        &self,
        category: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<Product>, CatalogError> {
        let mut extra = Vec::new();
        if let Some(category) = category.filter(|value| !value.trim().is_empty()) {
            extra.push(("category", category.trim().to_string()));
        }
        if let Some(search) = search.filter(|value| !value.trim().is_empty()) {
            extra.push(("search", search.trim().to_string()));
        }
        let body = self.fetch(Resource::Products, &extra).await?;
        field(&body, Resource::Products.as_str())
    }

    pub async fn articles(&self) -> Result<Vec<Article>, CatalogError> {
        let body = self.fetch(Resource::Articles, &[]).await?;
        field(&body, Resource::Articles.as_str())
    }

    pub async fn article(&self, id: RecordId) -> Result<Article, CatalogError> {
        let body = self
            .fetch(Resource::Articles, &[("id", id.to_string())])
            .await?;
        field(&body, Resource::Articles.singular())
    }

    pub async fn banners(&self) -> Result<Vec<Banner>, CatalogError> {
        let body = self.fetch(Resource::Banners, &[]).await?;
        field(&body, Resource::Banners.as_str())
    }

    /// Contact settings flattened to `key -> value`.
    pub async fn contacts(&self) -> Result<BTreeMap<String, String>, CatalogError> {
        let body = self.fetch(Resource::Settings, &[]).await?;
        let entries: BTreeMap<String, SettingEntry> = field(&body, Resource::Settings.as_str())?;
        Ok(entries
            .into_iter()
            .map(|(key, entry)| (key, entry.value))
            .collect())
    }

    async fn fetch(
        &self,
        resource: Resource,
        extra: &[(&str, String)],
    ) -> Result<Value, CatalogError> {
        let url = resource_url(&self.base, resource.as_str(), extra);
        debug!(%resource, "catalog request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| CatalogError::Transport(err.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| CatalogError::Transport(err.to_string()))?;
        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|err| CatalogError::Malformed(format!("status {status}: {err}")))?;
        if !status.is_success() {
            let message = body
                .get(ERROR_KEY)
                .and_then(Value::as_str)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed"))
                .to_string();
            return Err(CatalogError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(body)
    }
}

fn field<T: DeserializeOwned>(body: &Value, key: &str) -> Result<T, CatalogError> {
    let value = body
        .get(key)
        .ok_or_else(|| CatalogError::Malformed(format!("response lacks `{key}`")))?;
    serde_json::from_value(value.clone()).map_err(|err| CatalogError::Malformed(err.to_string()))
}
