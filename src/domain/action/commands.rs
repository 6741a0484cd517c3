use super::value_objects::{ActionChanges, ActionId, NewAction};

// ============================================================================
// Action Commands - Represent user intent
// ============================================================================

#[derive(Debug, Clone)]
pub enum ActionCommand {
    CreateAction(NewAction),
    UpdateAction {
        id: ActionId,
        changes: ActionChanges,
    },
    DeleteAction {
        id: ActionId,
    },
}

impl ActionCommand {
    /// Operation label used in logs and metrics
    pub fn operation(&self) -> &'static str {
        match self {
            ActionCommand::CreateAction(_) => "create",
            ActionCommand::UpdateAction { .. } => "update",
            ActionCommand::DeleteAction { .. } => "delete",
        }
    }
}
