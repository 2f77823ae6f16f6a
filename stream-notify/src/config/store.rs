//! Config file access.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::model::AppConfig;
use crate::credentials::{CredentialError, StoredToken, TokenStore};
use crate::{Error, Result};

/// Reads the config document and writes back persisted tokens.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    write_lock: tokio::sync::Mutex<()>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole document.
    pub async fn load(&self) -> Result<AppConfig> {
        let raw = self.read_raw().await?;
        AppConfig::from_json(&raw)
    }

    /// Merge `values` into the object at `section`, keeping every other key of
    /// the document as it is.
    pub async fn update_section(&self, section: &str, values: Map<String, Value>) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let raw = self.read_raw().await?;
        let mut document: Value = serde_json::from_str(&raw)?;
        let root = document
            .as_object_mut()
            .ok_or_else(|| Error::config("config document is not a JSON object"))?;
        let target = root
            .entry(section)
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| Error::config(format!("config section '{section}' is not an object")))?;
        target.extend(values);

        let contents = serde_json::to_string_pretty(&document)?;
        write_atomic(&self.path, contents).await?;
        debug!(path = %self.path.display(), section, "Updated config section");
        Ok(())
    }

    async fn read_raw(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            Error::config(format!("failed to read {}: {}", self.path.display(), e))
        })
    }
}

/// Replace `path` with `contents` through a temp file in the same directory.
async fn write_atomic(path: &Path, contents: String) -> Result<()> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    })
    .await
    .map_err(|e| Error::Other(format!("config writer task failed: {e}")))?
}

#[async_trait]
impl TokenStore for ConfigStore {
    async fn save_token(&self, token: &StoredToken) -> std::result::Result<(), CredentialError> {
        let mut values = Map::new();
        values.insert(
            "bearer_token".to_string(),
            Value::String(token.token.as_str().to_string()),
        );
        values.insert("expiry".to_string(), json!(token.expiry_timestamp()));
        self.update_section("twitch", values).await?;
        Ok(())
    }
}
