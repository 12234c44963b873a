use serde_json::{json, Value};

use linkbio::configuration::Settings;

use crate::helpers::{spawn_app_locally, unique_username};

#[tokio::test]
async fn create_profile_returns_201_and_stores_the_normalized_username() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;
    let username = unique_username();

    let response = app
        .post_profile(&json!({ "username": format!("  {} ", username.to_uppercase()) }))
        .await;

    assert_eq!(201, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["username"], username.as_str());
    assert_eq!(body["theme"], "default");

    let saved = app
        .pool
        .get()
        .await
        .unwrap()
        .query_one(
            "SELECT username FROM profiles WHERE username = $1",
            &[&username],
        )
        .await
        .expect("Failed to fetch saved profile.");
    assert_eq!(saved.get::<_, &str>("username"), username);

    app.delete_profile(&username).await;
}

#[tokio::test]
async fn create_profile_returns_400_for_invalid_usernames() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;

    let test_cases = [
        ("", "empty username"),
        ("ab", "too short"),
        ("admin", "reserved word"),
        ("john__doe", "consecutive specials"),
        ("-john", "leading special"),
        ("john doe", "whitespace inside"),
    ];

    for (username, description) in test_cases {
        let response = app.post_profile(&json!({ "username": username })).await;
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not return a 400 Bad Request for {}",
            description
        );
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn create_profile_returns_409_for_a_taken_username_in_any_case() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;
    let username = app.create_profile().await;

    let response = app
        .post_profile(&json!({ "username": username.to_uppercase() }))
        .await;

    assert_eq!(409, response.status().as_u16());
    app.delete_profile(&username).await;
}

#[tokio::test]
async fn create_profile_rejects_unknown_fields() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;

    let response = app
        .post_profile(&json!({ "username": unique_username(), "role": "admin" }))
        .await;

    assert_eq!(422, response.status().as_u16());
}

#[tokio::test]
async fn username_check_reports_verdict_suggestion_and_availability() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;
    let username = app.create_profile().await;

    let body: Value = app.check_username("  John Doe!! ").await.json().await.unwrap();
    assert_eq!(body["is_valid"], false);
    assert_eq!(body["error_kind"], "invalid_characters");
    assert_eq!(body["sanitized"], "john-doe");
    assert!(body["available"].is_null());

    let body: Value = app.check_username(&username).await.json().await.unwrap();
    assert_eq!(body["is_valid"], true);
    assert_eq!(body["available"], false);

    let body: Value = app
        .check_username(&unique_username())
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["available"], true);

    app.delete_profile(&username).await;
}

#[tokio::test]
async fn profile_can_be_updated_and_read_back() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;
    let username = app.create_profile().await;

    let response = app
        .patch_profile(
            &username,
            &json!({
                "display_name": "Jane Doe",
                "bio": "Writes about Rust",
                "avatar_url": "https://cdn.example.com/jane.png",
                "theme": "ocean",
            }),
        )
        .await;
    assert_eq!(200, response.status().as_u16());

    let body: Value = app
        .get(&format!("/profiles/{username}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["display_name"], "Jane Doe");
    assert_eq!(body["bio"], "Writes about Rust");
    assert_eq!(body["theme"], "ocean");
    assert_eq!(body["links"], json!([]));

    let response = app.patch_profile(&username, &json!({ "theme": "neon" })).await;
    assert_eq!(422, response.status().as_u16());

    let response = app
        .patch_profile(&username, &json!({ "bio": "b".repeat(201) }))
        .await;
    assert_eq!(400, response.status().as_u16());

    app.delete_profile(&username).await;
}

#[tokio::test]
async fn unknown_profile_is_404() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;

    let response = app.get(&format!("/profiles/{}", unique_username())).await;
    assert_eq!(404, response.status().as_u16());

    let response = app.get("/profiles/not%20a%20username").await;
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn qr_code_points_to_the_public_page() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;
    let username = app.create_profile().await;

    let body: Value = app
        .get(&format!("/profiles/{username}/qr"))
        .await
        .json()
        .await
        .unwrap();
    let profile_url = body["profile_url"].as_str().unwrap();
    assert!(profile_url.ends_with(&format!("/u/{username}")));
    assert!(body["qr_code_url"]
        .as_str()
        .unwrap()
        .starts_with("https://api.qrserver.com/v1/create-qr-code/?size=300x300&data="));

    app.delete_profile(&username).await;
}

#[tokio::test]
async fn export_contains_profile_links_and_analytics() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;
    let username = app.create_profile().await;
    let ids = app.create_links(&username, &["Blog", "Shop"]).await;
    app.post_empty(&format!("/u/{username}/links/{}/click", ids[1]))
        .await;

    let response = app.get(&format!("/profiles/{username}/export")).await;
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["profile"]["username"], username.as_str());
    assert_eq!(body["links"].as_array().unwrap().len(), 2);
    assert_eq!(body["analytics"][0]["link_id"], ids[1].as_str());
    assert!(body["exported_at"].is_string());

    app.delete_profile(&username).await;
}

#[tokio::test]
async fn deleting_a_profile_removes_everything() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;
    let username = app.create_profile().await;
    app.create_links(&username, &["Blog"]).await;
    app.get(&format!("/u/{username}")).await;

    let response = app.delete(&format!("/profiles/{username}")).await;
    assert_eq!(204, response.status().as_u16());

    let response = app.get(&format!("/profiles/{username}")).await;
    assert_eq!(404, response.status().as_u16());
    let response = app.delete(&format!("/profiles/{username}")).await;
    assert_eq!(404, response.status().as_u16());

    let client = app.pool.get().await.unwrap();
    let orphans: i64 = client
        .query_one(
            "SELECT (SELECT count(*) FROM links l \
                     LEFT JOIN profiles p ON p.id = l.profile_id \
                     WHERE p.id IS NULL) \
                  + (SELECT count(*) FROM analytics a \
                     LEFT JOIN profiles p ON p.id = a.profile_id \
                     WHERE p.id IS NULL)",
            &[],
        )
        .await
        .unwrap()
        .get(0);
    assert_eq!(orphans, 0);

    // The name is free again.
    let response = app.post_profile(&json!({ "username": username })).await;
    assert_eq!(201, response.status().as_u16());
    app.delete_profile(&username).await;
}
