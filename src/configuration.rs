use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub app_port: u16,
    pub app_addr: String,
    /// Public origin used to build profile page links, e.g. for QR codes.
    pub app_base_url: String,
    /// Default `tracing` filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Settings {
    pub fn load_configuration() -> Result<Settings, config::ConfigError> {
        // Initialise our configuration reader
        let settings = config::Config::builder()
            .add_source(config::File::with_name("configuration"))
            // E.g. `APP_DATABASE__HOST=db.example.com` overrides `database.host`.
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        // Try to deserialize the configuration values it read into
        // our `Settings` type.
        settings.try_deserialize()
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Debug)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    pub port: u16,
    pub host: String,
    pub database_name: String,
    /// Hosted databases usually refuse plain connections.
    #[serde(default)]
    pub require_ssl: bool,
}

impl DatabaseSettings {
    pub fn connection_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config
            .user(&self.username)
            .password(self.password.expose_secret())
            .host(&self.host)
            .port(self.port)
            .dbname(&self.database_name)
            .application_name("linkbio")
            .ssl_mode(if self.require_ssl {
                tokio_postgres::config::SslMode::Require
            } else {
                tokio_postgres::config::SslMode::Prefer
            });
        config
    }
}
