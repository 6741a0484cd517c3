// ============================================================================
// Action Domain - sustainability action records
// ============================================================================
//
// - Value objects (Action, NewAction, ActionChanges)
// - Commands (CreateAction, UpdateAction, DeleteAction)
// - Errors (ActionError enum)
// - Command Handler (store mutation + backup mirror refresh)
//
// ============================================================================

pub mod value_objects;
pub mod commands;
pub mod errors;
pub mod command_handler;

// Re-export for convenience
pub use value_objects::*;
pub use commands::*;
pub use errors::*;
pub use command_handler::*;
