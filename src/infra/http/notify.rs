//! "Notify me" requests for out-of-stock products.

use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;
use vitrina_api_types::StockNotifyRequest;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("notification service returned {status}")]
    Rejected { status: u16 },
}

#[derive(Clone, Debug)]
pub struct StockNotifier {
    client: Client,
    url: Url,
}

impl StockNotifier {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    /// Any 2xx counts as accepted; the body is ignored.
    pub async fn notify(&self, request: &StockNotifyRequest) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(request)
            .send()
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, product = %request.product_name, "stock notification rejected");
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }
        info!(product = %request.product_name, "stock notification sent");
        Ok(())
    }
}
