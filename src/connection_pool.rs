use anyhow::Context;
use axum::extract::{FromRef, FromRequestParts};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use http::request::Parts;

// ───── Current Crate Imports ────────────────────────────────────────────── //

use crate::configuration::DatabaseSettings;
use crate::routes::ApiError;

// ───── Body ─────────────────────────────────────────────────────────────── //

pub type ConnectionPool = Pool;

/// Builds a pool to PostgreSQL. Connections go through native TLS when the
/// database requires it, otherwise they are plain TCP.
pub fn get_connection_pool(
    settings: &DatabaseSettings,
) -> Result<ConnectionPool, anyhow::Error> {
    let pg_config = settings.connection_config();
    let manager_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };

    let manager = if settings.require_ssl {
        let connector = native_tls::TlsConnector::builder()
            .build()
            .context("Failed to build TLS connector")?;
        let tls = postgres_native_tls::MakeTlsConnector::new(connector);
        Manager::from_config(pg_config, tls, manager_config)
    } else {
        Manager::from_config(pg_config, tokio_postgres::NoTls, manager_config)
    };

    Pool::builder(manager)
        .max_size(16)
        .build()
        .context("Failed to build PostgreSQL connection pool")
}

/// Custom extractor that grabs a connection from the pool stored in the
/// application state.
pub struct DatabaseConnection(pub deadpool_postgres::Client);

#[axum::async_trait]
impl<S> FromRequestParts<S> for DatabaseConnection
where
    ConnectionPool: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let pool = ConnectionPool::from_ref(state);
        let client = pool
            .get()
            .await
            .context("Failed to get a connection from the pool")?;
        Ok(Self(client))
    }
}
