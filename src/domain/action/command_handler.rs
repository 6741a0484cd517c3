use std::sync::Arc;
use uuid::Uuid;

use crate::backup::BackupMirror;
use crate::metrics::ServiceMetrics;
use crate::store::ActionStore;

use super::commands::ActionCommand;
use super::errors::ActionError;
use super::value_objects::{Action, ActionId};

// ============================================================================
// Action Command Handler
// ============================================================================
//
// Orchestrates: Command → Record Store → Backup Mirror
//
// The mirror is rewritten from a fresh read of the store after each
// mutation. A failed rewrite is reported to the caller, but the store
// change stays in place.
//
// ============================================================================

/// How a list-all request was satisfied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    /// The store already had rows
    Stored,
    /// The store was empty and this many rows came back from the mirror
    Restored(usize),
    /// The store was empty and there is no mirror file
    NoBackup,
}

#[derive(Debug, Clone)]
pub struct ActionListing {
    pub actions: Vec<Action>,
    pub outcome: ListOutcome,
}

pub struct ActionCommandHandler {
    store: Arc<dyn ActionStore>,
    mirror: BackupMirror,
    metrics: Arc<ServiceMetrics>,
}

impl ActionCommandHandler {
    pub fn new(store: Arc<dyn ActionStore>, mirror: BackupMirror, metrics: Arc<ServiceMetrics>) -> Self {
        Self {
            store,
            mirror,
            metrics,
        }
    }

    /// Handle a mutating command and refresh the backup mirror
    pub async fn handle(&self, command: ActionCommand, correlation_id: Uuid) -> Result<ActionId, ActionError> {
        let operation = command.operation();

        let id = match command {
            ActionCommand::CreateAction(new_action) => {
                tracing::debug!(
                    correlation_id = %correlation_id,
                    action = %new_action.action,
                    date = %new_action.date,
                    points = new_action.points,
                    "Creating action"
                );
                self.store.create(new_action).await?
            }
            ActionCommand::UpdateAction { id, changes } => {
                if changes.is_empty() {
                    tracing::debug!(correlation_id = %correlation_id, id = id, "Update with no fields");
                }
                self.store.update(id, changes).await?
            }
            ActionCommand::DeleteAction { id } => {
                self.store.delete(id).await?;
                id
            }
        };

        tracing::info!(
            correlation_id = %correlation_id,
            operation = operation,
            id = id,
            backend = self.store.backend(),
            "✅ Action {}d",
            operation
        );

        let snapshot = self.store.list_all().await?;
        self.rewrite_mirror(&snapshot, correlation_id).await?;

        Ok(id)
    }

    /// Return every record, restoring from the backup mirror when the store is empty
    pub async fn list_or_restore(&self, correlation_id: Uuid) -> Result<ActionListing, ActionError> {
        let actions = self.store.list_all().await?;
        if !actions.is_empty() {
            return Ok(ActionListing {
                actions,
                outcome: ListOutcome::Stored,
            });
        }

        let Some(records) = self.mirror.read_snapshot().await? else {
            tracing::info!(
                correlation_id = %correlation_id,
                path = %self.mirror.path().display(),
                "Store is empty and no backup file exists"
            );
            return Ok(ActionListing {
                actions,
                outcome: ListOutcome::NoBackup,
            });
        };

        let ids = self.store.insert_many(records).await?;
        let restored = ids.len();
        self.metrics.record_restore(restored);

        let actions = self.store.list_all().await?;
        for action in &actions {
            tracing::debug!(correlation_id = %correlation_id, id = action.id, "Restored {}", action);
        }
        tracing::warn!(
            correlation_id = %correlation_id,
            restored = restored,
            path = %self.mirror.path().display(),
            "♻️ Store was empty, restored actions from backup"
        );

        // keep the mirror in step with the newly assigned ids
        self.rewrite_mirror(&actions, correlation_id).await?;

        Ok(ActionListing {
            actions,
            outcome: ListOutcome::Restored(restored),
        })
    }

    async fn rewrite_mirror(&self, snapshot: &[Action], correlation_id: Uuid) -> Result<(), ActionError> {
        match self.mirror.write_snapshot(snapshot).await {
            Ok(()) => {
                self.metrics.record_backup_write(true);
                Ok(())
            }
            Err(e) => {
                self.metrics.record_backup_write(false);
                tracing::error!(
                    correlation_id = %correlation_id,
                    error = %e,
                    "Backup mirror rewrite failed, store and mirror now differ"
                );
                Err(e.into())
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
