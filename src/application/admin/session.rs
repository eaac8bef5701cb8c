//! Admin key lifecycle: verify, persist, forget.
//!
//! ```text
//! Unauthenticated --login--> Verifying --probe ok--> Authenticated
//!                               |--401-----------> Unauthenticated (stored key cleared)
//!                               `--network error-> Unauthenticated (entered key kept)
//! Authenticated --logout / invalidate--> Unauthenticated
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, info, warn};
use vitrina_api_types::{Category, Resource};

use crate::application::admin::panel::decode_list;
use crate::application::error::{
    GatewayError, INVALID_CREDENTIALS_MESSAGE, KeyStoreError, PanelError, SessionError,
};
use crate::application::transport::{AdminKey, AdminTransport, Gateway};
use crate::application::ui::{AdminUi, Toast};

/// Durable home of the admin key between runs.
#[async_trait]
pub trait KeyStore: Send + Sync {
    async fn load(&self) -> Result<Option<String>, KeyStoreError>;
    async fn save(&self, key: &str) -> Result<(), KeyStoreError>;
    async fn clear(&self) -> Result<(), KeyStoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Verifying,
    Authenticated,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Verifying => "verifying",
            SessionState::Authenticated => "authenticated",
        }
    }
}

/// A successful probe: the bound gateway plus the categories it fetched,
/// so the caller can seed the category panel without a second request.
#[derive(Debug, Clone)]
pub struct Verified {
    pub gateway: Gateway,
    pub categories: Vec<Category>,
}

pub struct SessionController {
    transport: Arc<dyn AdminTransport>,
    store: Arc<dyn KeyStore>,
    ui: Arc<dyn AdminUi>,
    state: SessionState,
    entered_key: String,
    gateway: Option<Gateway>,
}

impl SessionController {
    pub fn new(
        transport: Arc<dyn AdminTransport>,
        store: Arc<dyn KeyStore>,
        ui: Arc<dyn AdminUi>,
    ) -> Self {
        Self {
            transport,
            store,
            ui,
            state: SessionState::Unauthenticated,
            entered_key: String::new(),
            gateway: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// What the operator last typed, kept after a connectivity failure so
    /// they can retry without re-entering it.
    pub fn entered_key(&self) -> &str {
        &self.entered_key
    }

    pub fn gateway(&self) -> Option<&Gateway> {
        self.gateway.as_ref()
    }

    /// Verify a previously stored key without prompting. A missing key is
    /// not an error.
    pub async fn restore(&mut self) -> Result<Option<Verified>, SessionError> {
        let Some(raw) = self.store.load().await? else {
            debug!("no stored admin key");
            return Ok(None);
        };
        let key = match AdminKey::new(&raw) {
            Ok(key) => key,
            Err(_) => {
                warn!("stored admin key is unusable; discarding it");
                self.store.clear().await?;
                return Ok(None);
            }
        };
        self.verify(key, false).await.map(Some)
    }

    pub async fn login(&mut self, raw: &str) -> Result<Verified, SessionError> {
        self.entered_key = raw.to_string();
        let key = match AdminKey::new(raw) {
            Ok(key) => key,
            Err(err) => {
                self.ui.toast(Toast::error(err.message.clone()));
                return Err(err.into());
            }
        };
        let result = self.verify(key, true).await;
        if let Err(err) = &result {
            self.ui.toast(Toast::error(err.user_message()));
        }
        result
    }

    pub async fn logout(&mut self) -> Result<(), SessionError> {
        self.gateway = None;
        self.entered_key.clear();
        self.transition(SessionState::Unauthenticated);
        self.store.clear().await?;
        info!("admin key discarded on logout");
        Ok(())
    }

    /// Drop the session after the server refused the key mid-session.
    pub async fn invalidate(&mut self) {
        self.gateway = None;
        self.transition(SessionState::Unauthenticated);
        self.forget_stored_key().await;
        self.ui.toast(Toast::error(INVALID_CREDENTIALS_MESSAGE));
    }

    async fn verify(&mut self, key: AdminKey, persist: bool) -> Result<Verified, SessionError> {
        self.transition(SessionState::Verifying);
        let gateway = Gateway::new(self.transport.clone(), key);
        let probe = gateway
            .call(Method::GET, Resource::Categories, None, None)
            .await;

        let categories = match probe {
            Ok(response) => decode_list::<Category>(&response, Resource::Categories),
            Err(err) => Err(PanelError::from(err)),
        };
        let categories = match categories {
            Ok(categories) => categories,
            Err(PanelError::Unauthorized) => {
                self.entered_key.clear();
                self.transition(SessionState::Unauthenticated);
                self.forget_stored_key().await;
                return Err(GatewayError::Unauthorized.into());
            }
            Err(err) => {
                self.transition(SessionState::Unauthenticated);
                return Err(match err {
                    PanelError::Rejected(message) => SessionError::Rejected(message),
                    PanelError::Transport(message) => SessionError::Transport(message),
                    other => SessionError::Malformed(other.to_string()),
                });
            }
        };

        if persist {
            self.store.save(gateway.key().expose()).await?;
        }
        self.entered_key.clear();
        self.gateway = Some(gateway.clone());
        self.transition(SessionState::Authenticated);
        Ok(Verified {
            gateway,
            categories,
        })
    }

    async fn forget_stored_key(&self) {
        if let Err(err) = self.store.clear().await {
            warn!(error = %err, "failed to clear stored admin key");
        }
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            info!(from = self.state.as_str(), to = next.as_str(), "admin session transition");
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::application::error::CONNECTIVITY_MESSAGE;
    use crate::application::testing::{RecordingUi, ScriptedTransport};
    use crate::infra::key_store::MemoryKeyStore;

    fn controller(
        transport: &Arc<ScriptedTransport>,
        store: &Arc<MemoryKeyStore>,
        ui: &Arc<RecordingUi>,
    ) -> SessionController {
        SessionController::new(transport.clone(), store.clone(), ui.clone())
    }

    #[tokio::test]
    async fn valid_key_is_persisted_and_probe_reused() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(json!({"categories": [{"id": 1, "slug": "yarn", "name": "Пряжа"}]}));
        let store = Arc::new(MemoryKeyStore::default());
        let ui = Arc::new(RecordingUi::default());
        let mut session = controller(&transport, &store, &ui);

        let verified = session.login(" s3cret ").await.expect("login");

        assert_eq!(session.state(), SessionState::Authenticated);
        assert_eq!(store.load().await.expect("load").as_deref(), Some("s3cret"));
        assert_eq!(verified.categories.len(), 1);
        assert_eq!(transport.keys_seen(), vec!["s3cret".to_string()]);
        assert!(ui.toasts().is_empty());
    }

    #[tokio::test]
    async fn invalid_key_ends_unauthenticated_with_nothing_stored() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.fail(GatewayError::Unauthorized);
        let store = Arc::new(MemoryKeyStore::with_key("stale"));
        let ui = Arc::new(RecordingUi::default());
        let mut session = controller(&transport, &store, &ui);

        let err = session.login("wrong").await.unwrap_err();

        assert!(matches!(err, SessionError::Unauthorized));
        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert_eq!(store.load().await.expect("load"), None);
        assert_eq!(ui.errors(), vec![INVALID_CREDENTIALS_MESSAGE.to_string()]);
        assert!(session.gateway().is_none());
    }

    #[tokio::test]
    async fn network_failure_keeps_the_entered_key() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.fail(GatewayError::Transport("dns error".into()));
        let store = Arc::new(MemoryKeyStore::default());
        let ui = Arc::new(RecordingUi::default());
        let mut session = controller(&transport, &store, &ui);

        session.login("s3cret").await.unwrap_err();

        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert_eq!(session.entered_key(), "s3cret");
        assert_eq!(ui.errors(), vec![CONNECTIVITY_MESSAGE.to_string()]);
        assert_eq!(store.load().await.expect("load"), None);
    }

    #[tokio::test]
    async fn blank_key_is_rejected_before_probing() {
        let transport = Arc::new(ScriptedTransport::new());
        let store = Arc::new(MemoryKeyStore::default());
        let ui = Arc::new(RecordingUi::default());
        let mut session = controller(&transport, &store, &ui);

        assert!(matches!(
            session.login("   ").await,
            Err(SessionError::Validation(_))
        ));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn restore_without_stored_key_is_quiet() {
        let transport = Arc::new(ScriptedTransport::new());
        let store = Arc::new(MemoryKeyStore::default());
        let ui = Arc::new(RecordingUi::default());
        let mut session = controller(&transport, &store, &ui);

        assert!(session.restore().await.expect("restore").is_none());
        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert_eq!(transport.call_count(), 0);
        assert!(ui.toasts().is_empty());
    }

    #[tokio::test]
    async fn restore_verifies_the_stored_key() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(json!({"categories": []}));
        let store = Arc::new(MemoryKeyStore::with_key("s3cret"));
        let ui = Arc::new(RecordingUi::default());
        let mut session = controller(&transport, &store, &ui);

        let verified = session.restore().await.expect("restore");

        assert!(verified.is_some());
        assert_eq!(session.state(), SessionState::Authenticated);
    }

    #[tokio::test]
    async fn logout_and_invalidate_forget_the_key() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .respond(json!({"categories": []}))
            .respond(json!({"categories": []}));
        let store = Arc::new(MemoryKeyStore::default());
        let ui = Arc::new(RecordingUi::default());
        let mut session = controller(&transport, &store, &ui);

        session.login("s3cret").await.expect("login");
        session.logout().await.expect("logout");
        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert_eq!(store.load().await.expect("load"), None);

        session.login("s3cret").await.expect("login again");
        session.invalidate().await;
        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert_eq!(store.load().await.expect("load"), None);
        assert_eq!(ui.last_toast(), Some(Toast::error(INVALID_CREDENTIALS_MESSAGE)));
    }
}
