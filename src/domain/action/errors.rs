use super::value_objects::ActionId;
use crate::backup::BackupError;
use crate::store::StoreError;

// ============================================================================
// Action Errors
// ============================================================================
//
// Only NotFound is distinguished; every other failure is reported as-is.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Action not found: {0}")]
    NotFound(ActionId),

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Backup(#[from] BackupError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<StoreError> for ActionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ActionError::NotFound(id),
            other => ActionError::Store(other),
        }
    }
}

impl ActionError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ActionError::NotFound(_))
    }
}
