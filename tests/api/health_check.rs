//! Health integration test.

use linkbio::configuration::Settings;

use crate::helpers::spawn_app_locally;

#[tokio::test]
async fn health_check_test() {
    let config = Settings::load_configuration().unwrap();

    let app = spawn_app_locally(config).await;

    // Act
    let response = app.get("/health_check").await;

    // Assert
    assert!(response.status().is_success());
    assert_eq!(Some(0), response.content_length());
}
