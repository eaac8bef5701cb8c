//! The authenticated shell that owns every panel.

use std::sync::Arc;

use tracing::info;

use crate::application::admin::articles::ArticleKind;
use crate::application::admin::banners::BannerKind;
use crate::application::admin::categories::CategoryKind;
use crate::application::admin::contacts::ContactsPanel;
use crate::application::admin::panel::ResourcePanel;
use crate::application::admin::products::ProductKind;
use crate::application::admin::promotions::PromotionKind;
use crate::application::admin::session::{SessionController, Verified};
use crate::application::admin::uploads::ImageUploader;
use crate::application::error::{PanelError, SessionError};
use crate::application::ui::AdminUi;

pub struct AdminPanels {
    pub categories: ResourcePanel<CategoryKind>,
    pub products: ResourcePanel<ProductKind>,
    pub articles: ResourcePanel<ArticleKind>,
    pub banners: ResourcePanel<BannerKind>,
    pub promotions: ResourcePanel<PromotionKind>,
    pub contacts: ContactsPanel,
    pub uploader: ImageUploader,
}

impl AdminPanels {
    /// Build the panels over a verified gateway, seeding categories from
    /// the probe response.
    pub fn new(verified: Verified, ui: Arc<dyn AdminUi>, max_upload_bytes: usize) -> Self {
        let Verified {
            gateway,
            categories,
        } = verified;
        Self {
            categories: ResourcePanel::with_records(gateway.clone(), ui.clone(), categories),
            products: ResourcePanel::new(gateway.clone(), ui.clone()),
            articles: ResourcePanel::new(gateway.clone(), ui.clone()),
            banners: ResourcePanel::new(gateway.clone(), ui.clone()),
            promotions: ResourcePanel::new(gateway.clone(), ui.clone()),
            contacts: ContactsPanel::new(gateway.clone(), ui.clone()),
            uploader: ImageUploader::new(gateway, ui, max_upload_bytes),
        }
    }

    /// Fetch every collection the probe did not already bring back.
    pub async fn load_all(&mut self) -> Result<(), PanelError> {
        tokio::try_join!(
            self.products.reload(),
            self.articles.reload(),
            self.banners.reload(),
            self.promotions.reload(),
            self.contacts.load(),
        )?;
        Ok(())
    }
}

pub struct AdminConsole {
    session: SessionController,
    ui: Arc<dyn AdminUi>,
    max_upload_bytes: usize,
    panels: Option<AdminPanels>,
}

impl AdminConsole {
    pub fn new(session: SessionController, ui: Arc<dyn AdminUi>, max_upload_bytes: usize) -> Self {
        Self {
            session,
            ui,
            max_upload_bytes,
            panels: None,
        }
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn panels(&self) -> Option<&AdminPanels> {
        self.panels.as_ref()
    }

    pub fn panels_mut(&mut self) -> Option<&mut AdminPanels> {
        self.panels.as_mut()
    }

    /// Try the stored key; returns whether the console is now open.
    pub async fn restore(&mut self) -> Result<bool, SessionError> {
        match self.session.restore().await? {
            Some(verified) => {
                self.open(verified);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn login(&mut self, raw: &str) -> Result<(), SessionError> {
        let verified = self.session.login(raw).await?;
        self.open(verified);
        Ok(())
    }

    pub async fn logout(&mut self) -> Result<(), SessionError> {
        self.panels = None;
        self.session.logout().await
    }

    pub async fn load_all(&mut self) -> Result<(), PanelError> {
        let Some(panels) = self.panels.as_mut() else {
            return Err(PanelError::Unauthorized);
        };
        let result = panels.load_all().await;
        self.settle(result).await
    }

    /// Pass a panel result through, closing the session when the server
    /// refused the key.
    pub async fn settle<T>(&mut self, result: Result<T, PanelError>) -> Result<T, PanelError> {
        if matches!(&result, Err(err) if err.is_unauthorized()) {
            self.invalidate().await;
        }
        result
    }

    /// Close every panel and forget the key the server refused.
    pub async fn invalidate(&mut self) {
        self.panels = None;
        self.session.invalidate().await;
    }

    fn open(&mut self, verified: Verified) {
        info!(categories = verified.categories.len(), "admin console opened");
        self.panels = Some(AdminPanels::new(
            verified,
            self.ui.clone(),
            self.max_upload_bytes,
        ));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::application::admin::session::{KeyStore, SessionState};
    use crate::application::admin::uploads::ImageFile;
    use crate::application::error::{GatewayError, INVALID_CREDENTIALS_MESSAGE};
    use crate::application::testing::{RecordingUi, ScriptedTransport};
    use crate::application::ui::Toast;
    use crate::infra::key_store::MemoryKeyStore;

    fn console(transport: &Arc<ScriptedTransport>, ui: &Arc<RecordingUi>) -> AdminConsole {
        let store = Arc::new(MemoryKeyStore::default());
        let session = SessionController::new(transport.clone(), store, ui.clone());
        AdminConsole::new(session, ui.clone(), 1024)
    }

    #[tokio::test]
    async fn login_seeds_categories_from_the_probe() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(json!({"categories": [
            {"id": 1, "slug": "yarn", "name": "Пряжа", "product_count": 3}
        ]}));
        let ui = Arc::new(RecordingUi::default());
        let mut console = console(&transport, &ui);

        console.login("s3cret").await.expect("login");

        let panels = console.panels().expect("panels");
        assert_eq!(panels.categories.records()[0].product_count, 3);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn unauthorized_mid_session_closes_the_console() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .respond(json!({"categories": []}))
            .fail(GatewayError::Unauthorized);
        let ui = Arc::new(RecordingUi::default());
        let mut console = console(&transport, &ui);
        console.login("s3cret").await.expect("login");

        let panels = console.panels_mut().expect("panels");
        let result = panels.banners.reload().await.map(|_| ());
        let err = console.settle(result).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert!(console.panels().is_none());
        assert_eq!(console.session().state(), SessionState::Unauthenticated);
        assert_eq!(ui.toasts(), vec![Toast::error(INVALID_CREDENTIALS_MESSAGE)]);
    }

    #[tokio::test]
    async fn refused_key_during_image_upload_closes_the_console() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .respond(json!({"categories": []}))
            .fail(GatewayError::Unauthorized);
        let ui = Arc::new(RecordingUi::default());
        let store = Arc::new(MemoryKeyStore::default());
        let session = SessionController::new(transport.clone(), store.clone(), ui.clone());
        let mut console = AdminConsole::new(session, ui.clone(), 1024);
        console.login("s3cret").await.expect("login");
        assert_eq!(store.load().await.expect("load").as_deref(), Some("s3cret"));

        let image = ImageFile::new("dot.png", "image/png", vec![0x89, b'P', b'N', b'G']);
        let panels = console.panels_mut().expect("panels");
        let result = panels.banners.attach_image(&panels.uploader, &image).await;
        let err = console.settle(result).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(transport.uploads().len(), 1);
        assert!(console.panels().is_none());
        assert_eq!(console.session().state(), SessionState::Unauthenticated);
        assert_eq!(store.load().await.expect("load"), None);
        assert_eq!(ui.toasts(), vec![Toast::error(INVALID_CREDENTIALS_MESSAGE)]);
    }

    #[tokio::test]
    async fn load_all_fills_every_panel() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .respond(json!({"categories": []}))
            .respond(json!({"products": [{"id": 1, "name": "Нитки", "price": "10"}]}))
            .respond(json!({"articles": []}))
            .respond(json!({"banners": []}))
            .respond(json!({"promotions": []}))
            .respond(json!({"settings": {}}));
        let ui = Arc::new(RecordingUi::default());
        let mut console = console(&transport, &ui);
        console.login("s3cret").await.expect("login");

        console.load_all().await.expect("load all");

        let panels = console.panels().expect("panels");
        assert_eq!(panels.products.records().len(), 1);
        assert_eq!(transport.call_count(), 6);
    }
}
