use std::ops::DerefMut;

use anyhow::Context;
use refinery::embed_migrations;

use crate::connection_pool::ConnectionPool;

embed_migrations!("./migrations");

pub(super) async fn run_migration(
    pool: &ConnectionPool,
) -> Result<(), anyhow::Error> {
    let mut connection = pool
        .get()
        .await
        .context("Failed to get a connection for migrations")?;
    let client = connection.deref_mut().deref_mut();

    let report = migrations::runner()
        .run_async(client)
        .await
        .context("Can't run migration on db")?;

    if report.applied_migrations().is_empty() {
        tracing::info!("No migrations applied");
    }

    for migration in report.applied_migrations() {
        tracing::info!("Migration: {}", migration);
    }
    Ok(())
}
