//! Error taxonomy shared by the admin subsystem.
//!
//! Every failure lands in one of four buckets: local validation, bad
//! credentials, a server rejection carrying an `error` message, or a
//! transport/shape problem. Each bucket has exactly one user-facing message.

use thiserror::Error;
use vitrina_api_types::{RecordId, Resource, ToggleField};

use crate::domain::error::ValidationError;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid admin key";
pub const CONNECTIVITY_MESSAGE: &str = "No connection to the server";
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Unexpected server response";

/// Failures raised by an [`AdminTransport`](crate::application::transport::AdminTransport).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("request rejected: invalid credentials")]
    Unauthorized,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl GatewayError {
    pub fn user_message(&self) -> &'static str {
        match self {
            GatewayError::Unauthorized => INVALID_CREDENTIALS_MESSAGE,
            GatewayError::Transport(_) => CONNECTIVITY_MESSAGE,
            GatewayError::Malformed(_) => UNEXPECTED_RESPONSE_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PanelError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("request rejected: invalid credentials")]
    Unauthorized,
    #[error("{0}")]
    Rejected(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("no {resource} record with id {id}")]
    UnknownRecord { resource: Resource, id: RecordId },
    #[error("{resource} records have no `{}` flag", .field.as_str())]
    UnsupportedToggle {
        resource: Resource,
        field: ToggleField,
    },
    #[error("{resource} records have no image")]
    NoImage { resource: Resource },
    /// The image was refused before or by the upload endpoint.
    #[error("{0}")]
    Upload(String),
    #[error("action declined")]
    Declined,
}

impl From<GatewayError> for PanelError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unauthorized => PanelError::Unauthorized,
            GatewayError::Transport(message) => PanelError::Transport(message),
            GatewayError::Malformed(message) => PanelError::Malformed(message),
        }
    }
}

impl From<UploadError> for PanelError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Gateway(err) => err.into(),
            other => PanelError::Upload(other.toast_message()),
        }
    }
}

impl PanelError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, PanelError::Unauthorized)
    }

    /// Text for the toast, or `None` when the failure is reported elsewhere
    /// (credentials go through session invalidation, a declined
    /// confirmation is silent).
    pub fn toast_message(&self) -> Option<String> {
        match self {
            PanelError::Unauthorized | PanelError::Declined => None,
            PanelError::Validation(err) => Some(err.message.clone()),
            PanelError::Rejected(message) | PanelError::Upload(message) => Some(message.clone()),
            PanelError::Transport(_) => Some(CONNECTIVITY_MESSAGE.to_string()),
            PanelError::Malformed(_) => Some(UNEXPECTED_RESPONSE_MESSAGE.to_string()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("key store io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("request rejected: invalid credentials")]
    Unauthorized,
    #[error("{0}")]
    Rejected(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),
}

impl SessionError {
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Unauthorized => INVALID_CREDENTIALS_MESSAGE.to_string(),
            SessionError::Transport(_) => CONNECTIVITY_MESSAGE.to_string(),
            SessionError::Malformed(_) => UNEXPECTED_RESPONSE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<GatewayError> for SessionError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unauthorized => SessionError::Unauthorized,
            GatewayError::Transport(message) => SessionError::Transport(message),
            GatewayError::Malformed(message) => SessionError::Malformed(message),
        }
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unsupported content type `{0}`")]
    UnsupportedType(String),
    #[error("file is {size} bytes; the limit is {limit}")]
    TooLarge { size: usize, limit: usize },
    #[error("another upload is still in progress")]
    InProgress,
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl UploadError {
    pub fn toast_message(&self) -> String {
        match self {
            UploadError::Gateway(err) => err.user_message().to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_and_declines_are_not_toasted() {
        assert_eq!(PanelError::Unauthorized.toast_message(), None);
        assert_eq!(PanelError::Declined.toast_message(), None);
    }

    #[test]
    fn rejections_surface_verbatim() {
        let err = PanelError::Rejected("slug уже занят".into());
        assert_eq!(err.toast_message().as_deref(), Some("slug уже занят"));
        let err = PanelError::from(GatewayError::Transport("connection reset".into()));
        assert_eq!(err.toast_message().as_deref(), Some(CONNECTIVITY_MESSAGE));
    }

    #[test]
    fn refused_upload_key_becomes_unauthorized() {
        let err = PanelError::from(UploadError::Gateway(GatewayError::Unauthorized));
        assert!(err.is_unauthorized());
        assert_eq!(err.toast_message(), None);
        let err = PanelError::from(UploadError::Rejected("Недопустимый формат".into()));
        assert_eq!(err.toast_message().as_deref(), Some("Недопустимый формат"));
    }
}
