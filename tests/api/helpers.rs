//! This is a module with common initialization functions.

use serde_json::{json, Value};

use linkbio::{
    configuration::Settings,
    connection_pool::{get_connection_pool, ConnectionPool},
    startup::Application,
    telemetry,
};

/// A running application on a random port, plus a separate pool to
/// inspect the database directly.
pub struct TestApp {
    pub address: String,
    pub pool: ConnectionPool,
    pub port: u16,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn check_username(&self, username: &str) -> reqwest::Response {
        self.api_client
            .get(&format!("{}/usernames/check", &self.address))
            .query(&[("username", username)])
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_profile(&self, body: &Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/profiles", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn patch_profile(
        &self,
        username: &str,
        body: &Value,
    ) -> reqwest::Response {
        self.api_client
            .patch(&format!("{}/profiles/{}", &self.address, username))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(&format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}{}", &self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_empty(&self, path: &str) -> reqwest::Response {
        self.api_client
            .post(&format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.api_client
            .delete(&format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Creates a profile with a fresh random username and returns it.
    pub async fn create_profile(&self) -> String {
        let username = unique_username();
        let response = self.post_profile(&json!({ "username": username })).await;
        assert_eq!(201, response.status().as_u16());
        username
    }

    /// Adds links with the given titles and returns their ids in order.
    pub async fn create_links(
        &self,
        username: &str,
        titles: &[&str],
    ) -> Vec<String> {
        let mut ids = Vec::new();
        for title in titles {
            let response = self
                .post_json(
                    &format!("/profiles/{username}/links"),
                    &json!({
                        "title": title,
                        "url": format!("https://example.com/{title}"),
                    }),
                )
                .await;
            assert_eq!(201, response.status().as_u16());
            let body: Value = response.json().await.unwrap();
            ids.push(body["id"].as_str().unwrap().to_string());
        }
        ids
    }

    /// Removes a profile, its links and analytics cascade with it.
    pub async fn delete_profile(&self, username: &str) {
        self.pool
            .get()
            .await
            .unwrap()
            .execute("DELETE FROM profiles WHERE username = $1", &[&username])
            .await
            .expect("Failed to delete test profile.");
    }
}

/// Random valid username, so tests can share one database.
pub fn unique_username() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("test-{}", &suffix[..20])
}

pub async fn spawn_app_locally(mut config: Settings) -> TestApp {
    let subscriber = telemetry::get_subscriber("info");
    let _ = telemetry::init_subscriber(subscriber);

    // We should randomize app port
    config.app_port = 0;

    let pool = get_connection_pool(&config.database)
        .expect("Failed to build test pool");

    let application = Application::build(config)
        .await
        .expect("Failed to build application");
    let port = application.port();
    let address = format!("http://127.0.0.1:{}", port);

    // Very important step
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address,
        // This pool is separate from our app's pool
        pool,
        port,
        api_client: reqwest::Client::new(),
    }
}
