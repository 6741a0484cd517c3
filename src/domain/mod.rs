// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each aggregate has its own subdirectory with value objects, commands,
// errors and a command handler. Persistence lives in `crate::store` and
// `crate::backup`.
//
// ============================================================================

pub mod action;
