//! Image upload side-flow shared by every panel that carries an image.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{info, warn};
use vitrina_api_types::{UploadRequest, URL_KEY};

use crate::application::admin::panel::rejection;
use crate::application::error::{GatewayError, UploadError};
use crate::application::transport::Gateway;
use crate::application::ui::{AdminUi, Toast};

/// Default ceiling matching the upload service.
pub const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its content type from the extension.
    pub async fn read(path: &Path) -> Result<Self, UploadError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(file_name, content_type, bytes))
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

pub struct ImageUploader {
    gateway: Gateway,
    ui: Arc<dyn AdminUi>,
    max_bytes: usize,
    uploading: AtomicBool,
}

impl ImageUploader {
    pub fn new(gateway: Gateway, ui: Arc<dyn AdminUi>, max_bytes: usize) -> Self {
        Self {
            gateway,
            ui,
            max_bytes,
            uploading: AtomicBool::new(false),
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::Acquire)
    }

    /// Upload and return the hosted URL, or toast the failure and return
    /// `None`.
    pub async fn upload(&self, file: &ImageFile, folder: &str) -> Option<String> {
        match self.try_upload(file, folder).await {
            Ok(url) => Some(url),
            Err(err) => {
                warn!(folder, file = %file.file_name, error = %err, "image upload failed");
                self.ui.toast(Toast::error(err.toast_message()));
                None
            }
        }
    }

    pub async fn try_upload(&self, file: &ImageFile, folder: &str) -> Result<String, UploadError> {
        if !file.content_type.starts_with("image/") {
            return Err(UploadError::UnsupportedType(file.content_type.clone()));
        }
        if file.bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                size: file.bytes.len(),
                limit: self.max_bytes,
            });
        }
        let _guard = UploadGuard::acquire(&self.uploading)?;

        let request = UploadRequest {
            file: file.data_url(),
            content_type: file.content_type.clone(),
            folder: folder.to_string(),
        };
        let response = self.gateway.upload(request).await?;
        if let Some(url) = response.get(URL_KEY).and_then(|url| url.as_str()) {
            info!(folder, file = %file.file_name, "image uploaded");
            return Ok(url.to_string());
        }
        match rejection(&response) {
            Some(message) => Err(UploadError::Rejected(message)),
            None => Err(GatewayError::Malformed("upload response lacks `url`".into()).into()),
        }
    }
}

/// Holds the `uploading` flag for the duration of one upload.
struct UploadGuard<'a>(&'a AtomicBool);

impl<'a> UploadGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, UploadError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| UploadError::InProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for UploadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
