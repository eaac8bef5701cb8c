//! HTTP adapters for the catalog service endpoints.

pub mod admin;
pub mod catalog;
pub mod notify;

pub use admin::HttpTransport;
pub use catalog::{CatalogClient, CatalogError};
pub use notify::{NotifyError, StockNotifier};

use reqwest::Client;
use url::Url;

use super::error::InfraError;

/// Header carrying the admin secret.
pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

pub fn user_agent() -> &'static str {
    concat!("vitrina/", env!("CARGO_PKG_VERSION"))
}

/// Shared client for every endpoint; no timeout beyond the transport default.
pub fn build_client() -> Result<Client, InfraError> {
    Client::builder()
        .user_agent(user_agent())
        .build()
        .map_err(|err| InfraError::http_client(err.to_string()))
}

/// Append `resource` and optional extra pairs to an endpoint URL.
fn resource_url(base: &Url, resource: &str, extra: &[(&str, String)]) -> Url {
    let mut url = base.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("resource", resource);
        for (key, value) in extra {
            pairs.append_pair(key, value);
        }
    }
    url
}
