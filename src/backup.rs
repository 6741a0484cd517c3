use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::action::{Action, NewAction};

// ============================================================================
// Backup Mirror - JSON snapshot of the whole table
// ============================================================================
//
// File format: [{"id": 1, "action": "...", "date": "YYYY-MM-DD", "points": 3}]
//
// The file is overwritten in place after every mutation. There is no lock
// and no temp-file rename, so concurrent writers can interleave.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("backup file {path} could not be accessed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("backup file {path} is not a valid snapshot: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug)]
pub struct BackupMirror {
    path: PathBuf,
}

impl BackupMirror {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the backup file with the given snapshot
    pub async fn write_snapshot(&self, actions: &[Action]) -> Result<(), BackupError> {
        let payload = serde_json::to_vec_pretty(actions).map_err(|source| BackupError::Format {
            path: self.path.clone(),
            source,
        })?;

        tokio::fs::write(&self.path, payload)
            .await
            .map_err(|source| BackupError::Io {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(
            path = %self.path.display(),
            records = actions.len(),
            "Backup mirror rewritten"
        );
        Ok(())
    }

    /// Read the snapshot back without its ids.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub async fn read_snapshot(&self) -> Result<Option<Vec<NewAction>>, BackupError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(BackupError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let records: Vec<NewAction> =
            serde_json::from_slice(&bytes).map_err(|source| BackupError::Format {
                path: self.path.clone(),
                source,
            })?;

        Ok(Some(records))
    }
}
