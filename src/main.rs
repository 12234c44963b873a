// ───── Current Crate Imports ────────────────────────────────────────────── //

use linkbio::{configuration::Settings, startup::Application, telemetry};

// ───── Body ─────────────────────────────────────────────────────────────── //

#[tokio::main]
async fn main() {
    // Panic if we can't read configuration
    let config =
        Settings::load_configuration().expect("Failed to read configuration.");

    let subscriber = telemetry::get_subscriber(&config.log_level);
    telemetry::init_subscriber(subscriber).expect("Failed to set up tracing");

    let application = match Application::build(config).await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("Failed to build application: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = application.run_until_stopped().await {
        tracing::error!("Error: {}", e);
    }
}
