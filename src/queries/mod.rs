//! Row access for the hosted PostgreSQL database.
//!
//! Functions take a plain `tokio_postgres::Client` (a pooled connection
//! derefs to one) and return `anyhow::Error` annotated with context.

use tokio_postgres::error::SqlState;

// ───── Submodules ───────────────────────────────────────────────────────── //

pub mod analytics;
pub mod links;
pub mod profiles;

// ───── Body ─────────────────────────────────────────────────────────────── //

/// Whether the failure was a unique constraint rejecting the write.
pub fn is_unique_violation(e: &anyhow::Error) -> bool {
    e.downcast_ref::<tokio_postgres::Error>()
        .and_then(|e| e.code())
        .map_or(false, |code| *code == SqlState::UNIQUE_VIOLATION)
}
