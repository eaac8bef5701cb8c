use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;
use vitrina_api_types::UploadRequest;

use super::{ADMIN_KEY_HEADER, resource_url};
use crate::application::error::GatewayError;
use crate::application::transport::{AdminKey, AdminTransport, ResourceRequest};

/// [`AdminTransport`] over the admin and upload endpoints.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    admin_url: Url,
    upload_url: Option<Url>,
}

impl HttpTransport {
    pub fn new(client: Client, admin_url: Url, upload_url: Option<Url>) -> Self {
        Self {
            client,
            admin_url,
            upload_url,
        }
    }

    fn authorized(&self, builder: RequestBuilder, key: &AdminKey) -> RequestBuilder {
        builder.header(ADMIN_KEY_HEADER, key.expose())
    }

    /// Any JSON body is handed back regardless of status so callers can read
    /// its `error` field. Only 401 is singled out.
    async fn dispatch(&self, builder: RequestBuilder) -> Result<Value, GatewayError> {
        let response = builder
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(GatewayError::Unauthorized);
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| {
            warn!(%status, error = %err, "response body is not JSON");
            GatewayError::Malformed(format!("status {status}: {err}"))
        })
    }
}

#[async_trait]
impl AdminTransport for HttpTransport {
    async fn call(&self, key: &AdminKey, request: ResourceRequest) -> Result<Value, GatewayError> {
        let ResourceRequest {
            method,
            resource,
            body,
            id,
        } = request;
        let extra: Vec<(&str, String)> = id.map(|id| ("id", id.to_string())).into_iter().collect();
        let url = resource_url(&self.admin_url, resource.as_str(), &extra);
        debug!(%method, %resource, ?id, "admin request");

        let mut builder = self.authorized(self.client.request(method.clone(), url), key);
        if let Some(body) = body.as_ref() {
            builder = builder.json(body);
        }
        let result = self.dispatch(builder).await;
        if let Err(err) = &result {
            debug!(%method, %resource, ?id, error = %err, "admin request failed");
        }
        result
    }

    async fn upload(&self, key: &AdminKey, request: UploadRequest) -> Result<Value, GatewayError> {
        let url = self
            .upload_url
            .clone()
            .ok_or_else(|| GatewayError::Transport("upload endpoint is not configured".into()))?;
        debug!(folder = %request.folder, content_type = %request.content_type, "upload request");
        let builder = self
            .authorized(self.client.request(Method::POST, url), key)
            .json(&request);
        self.dispatch(builder).await
    }
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;
    use serde_json::json;
    use vitrina_api_types::Resource;

    use super::*;
    use crate::infra::http::build_client;

    fn transport(server: &MockServer) -> HttpTransport {
        let admin = Url::parse(&server.url("/admin")).expect("admin url");
        let upload = Url::parse(&server.url("/upload")).expect("upload url");
        HttpTransport::new(build_client().expect("client"), admin, Some(upload))
    }

    fn key() -> AdminKey {
        AdminKey::new("s3cret").expect("key")
    }

    #[tokio::test]
    async fn get_sends_resource_and_key() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET")
                .path("/admin")
                .query_param("resource", "categories")
                .header("X-Admin-Key", "s3cret");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"categories":[]}"#);
        });

        let value = transport(&server)
            .call(&key(), ResourceRequest::list(Resource::Categories))
            .await
            .expect("call");

        mock.assert();
        assert_eq!(value, json!({"categories": []}));
    }

    #[tokio::test]
    async fn patch_carries_id_and_single_flag() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("PATCH")
                .path("/admin")
                .query_param("resource", "promotions")
                .query_param("id", "7")
                .json_body(json!({"is_active": false}));
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"promotion":{"id":7}}"#);
        });

        let request = ResourceRequest::new(
            Method::PATCH,
            Resource::Promotions,
            Some(json!({"is_active": false})),
            Some(7),
        );
        transport(&server)
            .call(&key(), request)
            .await
            .expect("call");

        mock.assert();
    }

    #[tokio::test]
    async fn unauthorized_is_distinguished() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/admin");
            then.status(401)
                .header("content-type", "application/json")
                .body(r#"{"error":"Unauthorized"}"#);
        });

        let err = transport(&server)
            .call(&key(), ResourceRequest::list(Resource::Banners))
            .await
            .unwrap_err();

        assert_eq!(err, GatewayError::Unauthorized);
    }

    #[tokio::test]
    async fn error_bodies_are_returned_for_inspection() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("POST").path("/admin");
            then.status(400)
                .header("content-type", "application/json")
                .body(r#"{"error":"slug уже существует"}"#);
        });

        let request = ResourceRequest::new(
            Method::POST,
            Resource::Categories,
            Some(json!({"slug": "yarn"})),
            None,
        );
        let value = transport(&server)
            .call(&key(), request)
            .await
            .expect("body");

        assert_eq!(value["error"], "slug уже существует");
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/admin");
            then.status(502).body("<html>Bad gateway</html>");
        });

        let err = transport(&server)
            .call(&key(), ResourceRequest::list(Resource::Articles))
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Malformed(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let admin = Url::parse("http://127.0.0.1:9/admin").expect("url");
        let transport = HttpTransport::new(build_client().expect("client"), admin, None);

        let err = transport
            .call(&key(), ResourceRequest::list(Resource::Products))
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Transport(_)));
    }

    #[tokio::test]
    async fn upload_posts_json_to_upload_endpoint() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST")
                .path("/upload")
                .header("X-Admin-Key", "s3cret")
                .json_body(json!({
                    "file": "data:image/png;base64,AAEC",
                    "content_type": "image/png",
                    "folder": "products"
                }));
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"url":"https://cdn.example/products/a.png"}"#);
        });

        let request = UploadRequest {
            file: "data:image/png;base64,AAEC".into(),
            content_type: "image/png".into(),
            folder: "products".into(),
        };
        let value = transport(&server)
            .upload(&key(), request)
            .await
            .expect("upload");

        mock.assert();
        assert_eq!(value["url"], "https://cdn.example/products/a.png");
    }
}
