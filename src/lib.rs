// Modules in folders
mod queries;
mod routes;

// Top-level modules
pub mod configuration;
pub mod connection_pool;
pub mod domain;
pub mod startup;
pub mod telemetry;

pub use routes::ApiError;

/// Prints an error followed by every error in its `source` chain.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
