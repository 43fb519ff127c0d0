//! Persistent storage for configuration entries
//!
//! Uses JSON file storage in ~/.config/sonatalink/entries.json

use crate::entry::{ConfigEntry, EntryId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Entry not found: {0}")]
    NotFound(String),
    #[error("Configuration directory not found")]
    NoConfigDir,
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Stored data structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredData {
    /// Configuration entries indexed by ID
    entries: HashMap<String, ConfigEntry>,
}

/// Entry store with file persistence
pub struct EntryStore {
    /// Path to the storage file
    path: PathBuf,
    /// In-memory cache of entries
    data: Arc<RwLock<StoredData>>,
}

impl EntryStore {
    /// Create a new entry store at the default location
    ///
    /// Loads existing data from disk if present.
    pub async fn new() -> StoreResult<Self> {
        let path = Self::default_path()?;
        Self::with_path(path).await
    }

    /// Create a store at a specific path
    pub async fn with_path(path: PathBuf) -> StoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Load existing data or create empty
        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            match serde_json::from_str(&contents) {
                Ok(data) => {
                    info!("Loaded entry store from {:?}", path);
                    data
                }
                Err(e) => {
                    warn!("Failed to parse entry store, starting fresh: {}", e);
                    StoredData::default()
                }
            }
        } else {
            debug!("No existing entry store, creating new");
            StoredData::default()
        };

        Ok(Self {
            path,
            data: Arc::new(RwLock::new(data)),
        })
    }

    /// Get the default store path (~/.config/sonatalink/entries.json)
    fn default_path() -> StoreResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        Ok(config_dir.join("sonatalink").join("entries.json"))
    }

    /// Save current state to disk
    async fn save(&self) -> StoreResult<()> {
        let data = self.data.read().await;
        let json = serde_json::to_string_pretty(&*data)?;
        std::fs::write(&self.path, json)?;
        debug!("Saved entry store to {:?}", self.path);
        Ok(())
    }

    /// Add or update an entry
    pub async fn save_entry(&self, entry: ConfigEntry) -> StoreResult<()> {
        let id = entry.id.to_string();
        {
            let mut data = self.data.write().await;
            data.entries.insert(id.clone(), entry);
        }
        self.save().await?;
        info!("Saved entry {}", id);
        Ok(())
    }

    /// Get an entry by ID
    pub async fn get_entry(&self, id: &EntryId) -> Option<ConfigEntry> {
        let data = self.data.read().await;
        data.entries.get(&id.to_string()).cloned()
    }

    /// List all stored entries
    pub async fn list_entries(&self) -> Vec<ConfigEntry> {
        let data = self.data.read().await;
        data.entries.values().cloned().collect()
    }

    /// Remove an entry by ID
    pub async fn remove_entry(&self, id: &EntryId) -> StoreResult<()> {
        let id_str = id.to_string();
        {
            let mut data = self.data.write().await;
            if data.entries.remove(&id_str).is_none() {
                return Err(StoreError::NotFound(id_str));
            }
        }
        self.save().await?;
        info!("Removed entry {}", id_str);
        Ok(())
    }
}
