//! Where the admin key lives between runs.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::application::admin::session::KeyStore;
use crate::application::error::KeyStoreError;

/// Keeps the key in a single owner-readable file.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    path: PathBuf,
}

impl FileKeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl KeyStore for FileKeyStore {
    async fn load(&self) -> Result<Option<String>, KeyStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let key = contents.trim();
                Ok((!key.is_empty()).then(|| key.to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, key: &str) -> Result<(), KeyStoreError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options.open(&self.path).await?;
        // `mode` only applies on creation; an older file may be wider.
        restrict_permissions(&self.path).await?;
        file.write_all(format!("{key}\n").as_bytes()).await?;
        file.flush().await?;
        debug!(path = %self.path.display(), "admin key stored");
        Ok(())
    }

    async fn clear(&self) -> Result<(), KeyStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    key: Mutex<Option<String>>,
}

impl MemoryKeyStore {
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: Mutex::new(Some(key.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.key.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn load(&self) -> Result<Option<String>, KeyStoreError> {
        Ok(self.slot().clone())
    }

    async fn save(&self, key: &str) -> Result<(), KeyStoreError> {
        *self.slot() = Some(key.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), KeyStoreError> {
        *self.slot() = None;
        Ok(())
    }
}
