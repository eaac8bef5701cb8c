#![deny(clippy::all, clippy::pedantic)]

use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use reqwest::Client;
use thiserror::Error;
use vitrina::application::admin::{AdminConsole, SessionController};
use vitrina::application::error::{GatewayError, PanelError, SessionError, UploadError};
use vitrina::application::ui::{AdminUi, Toast};
use vitrina::config::{LoadError, Settings};
use vitrina::domain::cart::CartError;
use vitrina::domain::error::ValidationError;
use vitrina::infra::error::InfraError;
use vitrina::infra::http::{
    CatalogClient, CatalogError, HttpTransport, NotifyError, StockNotifier, build_client,
};
use vitrina::infra::key_store::FileKeyStore;

use crate::args::ADMIN_KEY_ENV;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Panel(#[from] PanelError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error("not logged in (run `vitrina-admin login` or set {ADMIN_KEY_ENV})")]
    NotLoggedIn,
    #[error("admin key is required (set {ADMIN_KEY_ENV} or pipe it on stdin)")]
    MissingKey,
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to render output: {0}")]
    Output(String),
}

impl CliError {
    /// The server refused the admin key during this command.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            CliError::Panel(err) => err.is_unauthorized(),
            CliError::Upload(UploadError::Gateway(GatewayError::Unauthorized)) => true,
            _ => false,
        }
    }
}

/// Close the session if `result` shows the key was refused.
pub async fn settle<T>(
    console: &mut AdminConsole,
    result: Result<T, CliError>,
) -> Result<T, CliError> {
    if matches!(&result, Err(err) if err.is_unauthorized()) {
        console.invalidate().await;
    }
    result
}

/// Toasts go to stderr; confirmations read a line from stdin.
#[derive(Debug, Default)]
pub struct CliUi {
    assume_yes: bool,
}

impl CliUi {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl AdminUi for CliUi {
    fn toast(&self, toast: Toast) {
        eprintln!("{toast}");
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

pub struct Ctx {
    pub settings: Settings,
    pub client: Client,
    pub ui: Arc<CliUi>,
}

impl Ctx {
    pub fn new(settings: Settings, assume_yes: bool) -> Result<Self, CliError> {
        Ok(Self {
            settings,
            client: build_client()?,
            ui: Arc::new(CliUi::new(assume_yes)),
        })
    }

    pub fn key_store(&self) -> FileKeyStore {
        FileKeyStore::new(self.settings.session.key_file.clone())
    }

    /// A console that has not yet tried any key.
    pub fn console(&self) -> Result<AdminConsole, CliError> {
        let endpoints = &self.settings.endpoints;
        let transport = HttpTransport::new(
            self.client.clone(),
            endpoints.admin_url()?.clone(),
            endpoints.upload_url.clone(),
        );
        let session = SessionController::new(
            Arc::new(transport),
            Arc::new(self.key_store()),
            self.ui.clone(),
        );
        Ok(AdminConsole::new(
            session,
            self.ui.clone(),
            self.settings.uploads.max_bytes.get(),
        ))
    }

    /// An open console. A key in the environment wins over the stored one.
    pub async fn open_console(&self) -> Result<AdminConsole, CliError> {
        let mut console = self.console()?;
        if let Some(key) = env_key() {
            console.login(&key).await?;
        } else if !console.restore().await? {
            return Err(CliError::NotLoggedIn);
        }
        Ok(console)
    }

    pub fn catalog(&self) -> Result<CatalogClient, CliError> {
        Ok(CatalogClient::new(
            self.client.clone(),
            self.settings.endpoints.catalog_url()?.clone(),
        ))
    }

    pub fn notifier(&self) -> Result<StockNotifier, CliError> {
        Ok(StockNotifier::new(
            self.client.clone(),
            self.settings.endpoints.notify_url()?.clone(),
        ))
    }
}

pub fn env_key() -> Option<String> {
    env::var(ADMIN_KEY_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
