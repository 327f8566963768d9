//! End-to-end HTTP tests exercising the full stack: router, paste
//! orchestrator, KGS, metadata index, cache, and blob store wired together
//! the way [`crate::AppState::new`] wires them for a real deployment.

#[cfg(feature = "database-sqlite")]
mod http_api;
