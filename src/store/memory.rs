use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{ActionStore, StoreError};
use crate::domain::action::{Action, ActionChanges, ActionId, NewAction, MAX_ACTION_LEN};

/// Table kept in process memory.
///
/// Ids behave like a serial column: they start at 1 and are never handed out
/// twice, even after deletes.
pub struct InMemoryActionStore {
    state: RwLock<TableState>,
}

struct TableState {
    rows: BTreeMap<ActionId, Action>,
    next_id: ActionId,
}

impl TableState {
    fn insert(&mut self, new_action: NewAction) -> Result<ActionId, StoreError> {
        check_action_len(&new_action.action)?;
        let id = self.next_id;
        self.next_id += 1;
        self.rows.insert(id, new_action.with_id(id));
        Ok(id)
    }
}

fn check_action_len(action: &str) -> Result<(), StoreError> {
    let len = action.chars().count();
    if len > MAX_ACTION_LEN {
        return Err(StoreError::ActionTooLong { len });
    }
    Ok(())
}

impl InMemoryActionStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(TableState {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryActionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionStore for InMemoryActionStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_all(&self) -> Result<Vec<Action>, StoreError> {
        let state = self.state.read().await;
        Ok(state.rows.values().cloned().collect())
    }

    async fn create(&self, new_action: NewAction) -> Result<ActionId, StoreError> {
        self.state.write().await.insert(new_action)
    }

    async fn update(&self, id: ActionId, changes: ActionChanges) -> Result<ActionId, StoreError> {
        let mut state = self.state.write().await;
        let row = state.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if let Some(action) = &changes.action {
            check_action_len(action)?;
        }
        changes.apply_to(row);
        Ok(id)
    }

    async fn delete(&self, id: ActionId) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn insert_many(&self, records: Vec<NewAction>) -> Result<Vec<ActionId>, StoreError> {
        // all-or-nothing, like the transaction on the Postgres side
        for record in &records {
            check_action_len(&record.action)?;
        }

        let mut state = self.state.write().await;
        records.into_iter().map(|record| state.insert(record)).collect()
    }
}
