// ============================================================================
// Record Store - authoritative table of action records
// ============================================================================
//
// `ActionStore` is the seam between the command handler and persistence.
//
// - postgres.rs - sqlx-backed table (production)
// - memory.rs   - process-local table (no DATABASE_URL, and tests)
//
// ============================================================================

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::domain::action::{Action, ActionChanges, ActionId, NewAction, MAX_ACTION_LEN};

pub use memory::InMemoryActionStore;
pub use postgres::PostgresActionStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Action not found: {0}")]
    NotFound(ActionId),

    #[error("action is {len} characters long, the column holds at most {max}", max = MAX_ACTION_LEN)]
    ActionTooLong { len: usize },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ActionStore: Send + Sync {
    /// Short backend label for logs
    fn backend(&self) -> &'static str;

    /// All records ordered by id
    async fn list_all(&self) -> Result<Vec<Action>, StoreError>;

    /// Insert one record and return its assigned id
    async fn create(&self, new_action: NewAction) -> Result<ActionId, StoreError>;

    /// Apply a partial update; fails with `NotFound` for an unknown id
    async fn update(&self, id: ActionId, changes: ActionChanges) -> Result<ActionId, StoreError>;

    /// Remove a record; fails with `NotFound` for an unknown id
    async fn delete(&self, id: ActionId) -> Result<(), StoreError>;

    /// Insert many records at once, each receiving a fresh id
    async fn insert_many(&self, records: Vec<NewAction>) -> Result<Vec<ActionId>, StoreError>;
}
