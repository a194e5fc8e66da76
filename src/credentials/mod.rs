//! OAuth credential storage shared by every front-end

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::core::AppConfig;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub scope: Option<String>,
    pub token_type: String,
}

impl Credential {
    pub fn bearer(access_token: &str) -> Self {
        Self {
            access_token: access_token.to_string(),
            refresh_token: None,
            expires_at: None,
            scope: None,
            token_type: String::from("Bearer"),
        }
    }
}

/// Capability to read and replace the single process-wide credential.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self) -> Result<Option<Credential>>;
    async fn set(&self, credential: Credential) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

/// File backed when a credentials path is configured, otherwise held in
/// memory for the life of the process.
pub fn store_from_config(config: &AppConfig) -> Arc<dyn CredentialStore> {
    match &config.credentials_path {
        Some(path) => {
            tracing::info!("Using credential file {}", path.display());
            Arc::new(FileCredentialStore::new(path))
        }
        None => Arc::new(InMemoryCredentialStore::new()),
    }
}

#[derive(Default)]
pub struct InMemoryCredentialStore {
    slot: RwLock<Option<Credential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: RwLock::new(Some(credential)),
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self) -> Result<Option<Credential>> {
        Ok(self.slot.read().await.clone())
    }

    async fn set(&self, credential: Credential) -> Result<()> {
        *self.slot.write().await = Some(credential);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.slot.write().await = None;
        Ok(())
    }
}

/// Persists the credential as JSON so it survives restarts and can be
/// shared with a standalone tool server process. The file is read on
/// every access so a credential saved by another process is picked up.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self) -> Result<Option<Credential>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let credential = serde_json::from_str(&contents).with_context(|| {
                    format!("Failed to parse credential file {}", self.path.display())
                })?;
                Ok(Some(credential))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| {
                format!("Failed to read credential file {}", self.path.display())
            }),
        }
    }

    async fn set(&self, credential: Credential) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_string_pretty(&credential)?;
        tokio::fs::write(&self.path, contents)
            .await
            .with_context(|| format!("Failed to write credential file {}", self.path.display()))?;
        tracing::info!("Saved credential to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }
}
