// # File Resource State
//
// JSON file implementation of ResourceState.
//
// ## Purpose
//
// Lets a resource be described in a file, operated on by `rrsetctl`, and
// have the server identifier and refreshed fields written back to the same
// file.
//
// ## Crash Recovery
//
// - Atomic writes: write to `.tmp`, then rename over the file
// - Backup: the previous contents are kept in `.backup`
// - Recovery: a file that fails to parse is replaced by its backup
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "id": "8a5c6f1e-...",
//   "fields": {
//     "name": "www",
//     "zone_id": "2b7e2a3c-...",
//     "type": "AAAA",
//     "ttl": 300,
//     "record_addresses": ["2001:db8::1"]
//   }
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use super::ResourceData;
use crate::Error;
use crate::traits::{Field, FieldValue, ResourceState};

/// State file format version
const STATE_FILE_VERSION: &str = "1.0";

/// File-backed resource state
///
/// Every write is flushed to disk before the call returns.
///
/// # Example
///
/// ```rust,no_run
/// use rrset_core::state::FileResourceState;
/// use rrset_core::traits::{Field, ResourceState};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let state = FileResourceState::open("www.rrset.json").await?;
///     let zone_id = state.get_string(Field::ZoneId).await?;
///     println!("zone {zone_id}, id {:?}", state.id().await?);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileResourceState {
    path: PathBuf,
    data: Arc<RwLock<ResourceData>>,
}

/// Serializable state file format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StateFileFormat {
    version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    fields: BTreeMap<Field, FieldValue>,
}

impl FileResourceState {
    /// Open a state file, creating parent directories as needed
    ///
    /// A missing file yields empty state. A corrupted file is recovered from
    /// its backup when one exists; otherwise the parse error is returned, since
    /// the file describes what the user wants and must not be silently dropped.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    Error::state_store(format!(
                        "Failed to create state directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let data = Self::load_with_recovery(&path).await?;

        Ok(Self {
            path,
            data: Arc::new(RwLock::new(data)),
        })
    }

    /// Path of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current data
    pub async fn snapshot(&self) -> ResourceData {
        self.data.read().await.clone()
    }

    async fn load_with_recovery(path: &Path) -> Result<ResourceData, Error> {
        match Self::load(path).await {
            Ok(data) => Ok(data),
            Err(Error::Json(e)) => {
                let backup_path = Self::backup_path(path);
                if !backup_path.exists() {
                    return Err(Error::state_store(format!(
                        "Failed to parse state file {}: {}",
                        path.display(),
                        e
                    )));
                }

                tracing::warn!(
                    "State file {} appears corrupted: {}. Recovering from backup.",
                    path.display(),
                    e
                );
                let data = Self::load(&backup_path).await?;
                fs::copy(&backup_path, path).await.map_err(|e| {
                    Error::state_store(format!(
                        "Failed to restore from backup {}: {}",
                        backup_path.display(),
                        e
                    ))
                })?;
                tracing::info!("Restored state file from backup");
                Ok(data)
            }
            Err(e) => Err(e),
        }
    }

    async fn load(path: &Path) -> Result<ResourceData, Error> {
        if !path.exists() {
            tracing::debug!("State file does not exist: {}", path.display());
            return Ok(ResourceData::default());
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            Error::state_store(format!(
                "Failed to read state file {}: {}",
                path.display(),
                e
            ))
        })?;

        let state_file: StateFileFormat = serde_json::from_str(&content)?;

        if state_file.version != STATE_FILE_VERSION {
            tracing::warn!(
                "State file version mismatch: expected {}, got {}. Loading anyway.",
                STATE_FILE_VERSION,
                state_file.version
            );
        }

        Ok(ResourceData {
            id: state_file.id,
            fields: state_file.fields,
        })
    }

    /// Write the state atomically
    async fn write(&self, data: &ResourceData) -> Result<(), Error> {
        let state_file = StateFileFormat {
            version: STATE_FILE_VERSION.to_string(),
            id: data.id.clone(),
            fields: data.fields.clone(),
        };
        let json = serde_json::to_string_pretty(&state_file)?;

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
            file.write_all(json.as_bytes()).await?;
            file.flush().await?;
        }

        if self.path.exists() {
            let backup_path = Self::backup_path(&self.path);
            if let Err(e) = fs::copy(&self.path, &backup_path).await {
                tracing::warn!("Failed to create backup: {}", e);
            }
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::state_store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("State written to file: {}", self.path.display());
        Ok(())
    }

    /// Apply `mutate` to a copy, write it, and only then publish it
    ///
    /// A failed write leaves the in-memory state as it was.
    async fn commit(&self, mutate: impl FnOnce(&mut ResourceData)) -> Result<(), Error> {
        let mut guard = self.data.write().await;
        let mut next = guard.clone();
        mutate(&mut next);
        self.write(&next).await?;
        *guard = next;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }
}

#[async_trait]
impl ResourceState for FileResourceState {
    async fn get(&self, field: Field) -> Result<Option<FieldValue>, Error> {
        Ok(self.data.read().await.fields.get(&field).cloned())
    }

    async fn set(&self, field: Field, value: FieldValue) -> Result<(), Error> {
        self.commit(|data| {
            data.fields.insert(field, value);
        })
        .await
    }

    async fn id(&self) -> Result<Option<String>, Error> {
        Ok(self.data.read().await.id.clone())
    }

    async fn set_id(&self, id: &str) -> Result<(), Error> {
        self.commit(|data| data.id = Some(id.to_string())).await
    }

    async fn clear_id(&self) -> Result<(), Error> {
        self.commit(|data| data.id = None).await
    }
}
