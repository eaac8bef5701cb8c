//! The authenticated gateway seam.
//!
//! [`AdminTransport`] is the only thing that talks to the network; the
//! panels, the session controller and the uploader all go through a
//! [`Gateway`], which pins a transport to the session's key.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use vitrina_api_types::{RecordId, Resource, UploadRequest};

use crate::application::error::GatewayError;
use crate::domain::error::ValidationError;

/// The admin secret. Immutable for the lifetime of a session and never
/// printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminKey(Arc<str>);

impl AdminKey {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::new("admin_key", "Enter the admin key"));
        }
        if !trimmed.chars().all(|ch| ch.is_ascii_graphic()) {
            return Err(ValidationError::new(
                "admin_key",
                "Admin key must be printable ASCII without spaces",
            ));
        }
        Ok(Self(Arc::from(trimmed)))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminKey(***)")
    }
}

/// One call against the admin endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRequest {
    pub method: Method,
    pub resource: Resource,
    pub body: Option<Value>,
    pub id: Option<RecordId>,
}

impl ResourceRequest {
    pub fn new(
        method: Method,
        resource: Resource,
        body: Option<Value>,
        id: Option<RecordId>,
    ) -> Self {
        Self {
            method,
            resource,
            body,
            id,
        }
    }

    pub fn list(resource: Resource) -> Self {
        Self::new(Method::GET, resource, None, None)
    }
}

#[async_trait]
pub trait AdminTransport: Send + Sync {
    /// Issue an authenticated request and return the parsed JSON body.
    ///
    /// Any well-formed JSON body is returned as-is regardless of status, so
    /// callers can read an `error` field. A 401 maps to
    /// [`GatewayError::Unauthorized`].
    async fn call(&self, key: &AdminKey, request: ResourceRequest) -> Result<Value, GatewayError>;

    /// Post an encoded file to the upload endpoint.
    async fn upload(&self, key: &AdminKey, request: UploadRequest) -> Result<Value, GatewayError>;
}

/// A transport bound to one authenticated key.
#[derive(Clone)]
pub struct Gateway {
    transport: Arc<dyn AdminTransport>,
    key: AdminKey,
}

impl Gateway {
    pub fn new(transport: Arc<dyn AdminTransport>, key: AdminKey) -> Self {
        Self { transport, key }
    }

    pub fn key(&self) -> &AdminKey {
        &self.key
    }

    pub async fn call(
        &self,
        method: Method,
        resource: Resource,
        body: Option<Value>,
        id: Option<RecordId>,
    ) -> Result<Value, GatewayError> {
        self.transport
            .call(&self.key, ResourceRequest::new(method, resource, body, id))
            .await
    }

    pub async fn upload(&self, request: UploadRequest) -> Result<Value, GatewayError> {
        self.transport.upload(&self.key, request).await
    }
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway").field("key", &self.key).finish()
    }
}
