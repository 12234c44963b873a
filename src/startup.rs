use axum::extract::FromRef;
use axum::routing;
use axum::serve::Serve;
use axum::Router;
use tokio::net::TcpListener;

// ───── Current Crate Imports ────────────────────────────────────────────── //

use crate::configuration::Settings;
use crate::connection_pool::{get_connection_pool, ConnectionPool};
use crate::routes;

mod db_migration;

// ───── Body ─────────────────────────────────────────────────────────────── //

/// This is a central type of our codebase. `Application` type builds server
/// for both production and testing purposes.
pub struct Application {
    port: u16,
    serve: Serve<Router, Router>,
}

/// Public origin of the application, used to build shareable links.
#[derive(Clone, Debug)]
pub struct ApplicationBaseUrl(pub String);

/// Shareable type, we insert it to the main `Router` as state,
/// at the launch stage.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: ConnectionPool,
    pub base_url: ApplicationBaseUrl,
}

impl Application {
    /// Build a new server.
    ///
    /// This functions builds a new `Application` with given configuration.
    /// It also configures a pool of connections to the PostgreSQL database
    /// and applies pending migrations.
    pub async fn build(
        configuration: Settings,
    ) -> Result<Application, anyhow::Error> {
        let pool = get_connection_pool(&configuration.database)?;

        db_migration::run_migration(&pool).await?;

        let address =
            format!("{}:{}", configuration.app_addr, configuration.app_port);
        let listener = TcpListener::bind(address).await?;
        let port = listener.local_addr()?.port();
        tracing::info!("Listening on port {}", port);

        let serve = Self::build_server(
            listener,
            AppState {
                pool,
                base_url: ApplicationBaseUrl(configuration.app_base_url),
            },
        );

        Ok(Self { serve, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// This function only returns when the application is stopped.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.serve.await?;
        Ok(())
    }

    /// Configure `Server`.
    fn build_server(
        listener: TcpListener,
        app_state: AppState,
    ) -> Serve<Router, Router> {
        let app = Router::new()
            .route("/health_check", routing::get(routes::health_check))
            .route("/usernames/check", routing::get(routes::check_username))
            .route("/profiles", routing::post(routes::create_profile))
            .route(
                "/profiles/:username",
                routing::get(routes::get_profile)
                    .patch(routes::update_profile)
                    .delete(routes::delete_profile),
            )
            .route("/profiles/:username/qr", routing::get(routes::get_qr_code))
            .route(
                "/profiles/:username/export",
                routing::get(routes::export_profile),
            )
            .route(
                "/profiles/:username/analytics",
                routing::get(routes::get_analytics),
            )
            .route(
                "/profiles/:username/links",
                routing::get(routes::list_links).post(routes::create_link),
            )
            .route(
                "/profiles/:username/links/reorder",
                routing::post(routes::reorder_links),
            )
            .route(
                "/profiles/:username/links/compact",
                routing::post(routes::compact_links),
            )
            .route(
                "/profiles/:username/links/:link_id",
                routing::patch(routes::update_link)
                    .delete(routes::delete_link),
            )
            .route(
                "/profiles/:username/links/:link_id/toggle",
                routing::post(routes::toggle_link),
            )
            .route("/u/:username", routing::get(routes::get_public_page))
            .route(
                "/u/:username/links/:link_id/click",
                routing::post(routes::record_click),
            )
            .with_state(app_state);

        axum::serve(listener, app)
    }
}
