//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{env, num::NonZeroUsize, path::PathBuf, str::FromStr};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

mod cli;
#[cfg(test)]
mod tests;

pub use cli::ConfigOverrides;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "vitrina";
const ENV_PREFIX: &str = "VITRINA";
const FALLBACK_KEY_FILE: &str = ".vitrina_admin_key";
const DEFAULT_UPLOAD_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoints: EndpointSettings,
    pub session: SessionSettings,
    pub uploads: UploadSettings,
    pub logging: LoggingSettings,
}

/// Deployment URLs. Each is optional until a command needs it.
#[derive(Debug, Clone, Default)]
pub struct EndpointSettings {
    pub admin_url: Option<Url>,
    pub upload_url: Option<Url>,
    pub catalog_url: Option<Url>,
    pub notify_url: Option<Url>,
}

impl EndpointSettings {
    pub fn admin_url(&self) -> Result<&Url, LoadError> {
        self.admin_url
            .as_ref()
            .ok_or(LoadError::Missing("endpoints.admin_url"))
    }

    pub fn upload_url(&self) -> Result<&Url, LoadError> {
        self.upload_url
            .as_ref()
            .ok_or(LoadError::Missing("endpoints.upload_url"))
    }

    pub fn catalog_url(&self) -> Result<&Url, LoadError> {
        self.catalog_url
            .as_ref()
            .ok_or(LoadError::Missing("endpoints.catalog_url"))
    }

    pub fn notify_url(&self) -> Result<&Url, LoadError> {
        self.notify_url
            .as_ref()
            .ok_or(LoadError::Missing("endpoints.notify_url"))
    }
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub key_file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub max_bytes: NonZeroUsize,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("missing configuration for `{0}`")]
    Missing(&'static str),
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(overrides: &ConfigOverrides) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = overrides.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(overrides);
    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    endpoints: RawEndpointSettings,
    session: RawSessionSettings,
    uploads: RawUploadSettings,
    logging: RawLoggingSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(url) = overrides.admin_url.as_ref() {
            self.endpoints.admin_url = Some(url.clone());
        }
        if let Some(url) = overrides.upload_url.as_ref() {
            self.endpoints.upload_url = Some(url.clone());
        }
        if let Some(url) = overrides.catalog_url.as_ref() {
            self.endpoints.catalog_url = Some(url.clone());
        }
        if let Some(url) = overrides.notify_url.as_ref() {
            self.endpoints.notify_url = Some(url.clone());
        }
        if let Some(path) = overrides.key_file.as_ref() {
            self.session.key_file = Some(path.clone());
        }
        if let Some(bytes) = overrides.upload_max_bytes {
            self.uploads.max_bytes = Some(bytes);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            endpoints,
            session,
            uploads,
            logging,
        } = raw;

        Ok(Self {
            endpoints: build_endpoint_settings(endpoints)?,
            session: build_session_settings(session),
            uploads: build_upload_settings(uploads)?,
            logging: build_logging_settings(logging)?,
        })
    }
}

fn build_endpoint_settings(endpoints: RawEndpointSettings) -> Result<EndpointSettings, LoadError> {
    Ok(EndpointSettings {
        admin_url: parse_url(endpoints.admin_url, "endpoints.admin_url")?,
        upload_url: parse_url(endpoints.upload_url, "endpoints.upload_url")?,
        catalog_url: parse_url(endpoints.catalog_url, "endpoints.catalog_url")?,
        notify_url: parse_url(endpoints.notify_url, "endpoints.notify_url")?,
    })
}

fn build_session_settings(session: RawSessionSettings) -> SessionSettings {
    let key_file = session
        .key_file
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(default_key_file);
    SessionSettings { key_file }
}

fn build_upload_settings(uploads: RawUploadSettings) -> Result<UploadSettings, LoadError> {
    let value = uploads.max_bytes.unwrap_or(DEFAULT_UPLOAD_MAX_BYTES);
    let value = usize::try_from(value).map_err(|_| {
        LoadError::invalid("uploads.max_bytes", "value exceeds supported range for usize")
    })?;
    let max_bytes = NonZeroUsize::new(value)
        .ok_or_else(|| LoadError::invalid("uploads.max_bytes", "must be greater than zero"))?;
    Ok(UploadSettings { max_bytes })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

/// Blank values count as unset; anything else must be an absolute http(s) URL.
fn parse_url(value: Option<String>, key: &'static str) -> Result<Option<Url>, LoadError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let url = Url::parse(trimmed)
        .map_err(|err| LoadError::invalid(key, format!("failed to parse: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(Some(url)),
        other => Err(LoadError::invalid(
            key,
            format!("unsupported scheme `{other}`"),
        )),
    }
}

fn default_key_file() -> PathBuf {
    match env::var_os("HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home)
            .join(".config")
            .join("vitrina")
            .join("admin_key"),
        _ => PathBuf::from(FALLBACK_KEY_FILE),
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawEndpointSettings {
    admin_url: Option<String>,
    upload_url: Option<String>,
    catalog_url: Option<String>,
    notify_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSessionSettings {
    key_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawUploadSettings {
    max_bytes: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}
