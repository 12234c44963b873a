use serde_json::{json, Value};

use linkbio::configuration::Settings;

use crate::helpers::{spawn_app_locally, TestApp};

async fn titles_and_indices(app: &TestApp, username: &str) -> Vec<(String, u64)> {
    let body: Value = app
        .get(&format!("/profiles/{username}/links"))
        .await
        .json()
        .await
        .unwrap();
    body.as_array()
        .unwrap()
        .iter()
        .map(|l| {
            (
                l["title"].as_str().unwrap().to_string(),
                l["order_index"].as_u64().unwrap(),
            )
        })
        .collect()
}

fn expected(pairs: &[(&str, u64)]) -> Vec<(String, u64)> {
    pairs.iter().map(|(t, i)| (t.to_string(), *i)).collect()
}

#[tokio::test]
async fn new_links_are_appended_in_order() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;
    let username = app.create_profile().await;

    app.create_links(&username, &["A", "B", "C"]).await;

    assert_eq!(
        titles_and_indices(&app, &username).await,
        expected(&[("A", 0), ("B", 1), ("C", 2)])
    );
    app.delete_profile(&username).await;
}

#[tokio::test]
async fn create_link_returns_400_for_invalid_data() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;
    let username = app.create_profile().await;
    let path = format!("/profiles/{username}/links");

    let test_cases = [
        (json!({ "title": "", "url": "https://example.com" }), "empty title"),
        (json!({ "title": "x", "url": "example" }), "relative url"),
        (
            json!({
                "title": "x",
                "url": "https://example.com",
                "schedule": {
                    "start": "2024-06-01T00:00:00Z",
                    "end": "2024-05-01T00:00:00Z"
                }
            }),
            "inverted schedule",
        ),
    ];
    for (body, description) in test_cases {
        let response = app.post_json(&path, &body).await;
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not return a 400 Bad Request for {}",
            description
        );
    }
    app.delete_profile(&username).await;
}

#[tokio::test]
async fn reorder_moves_the_dragged_link_into_the_target_slot() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;
    let username = app.create_profile().await;
    let ids = app.create_links(&username, &["A", "B", "C", "D"]).await;

    let response = app
        .post_json(
            &format!("/profiles/{username}/links/reorder"),
            &json!({ "moved_id": ids[3], "target_id": ids[1] }),
        )
        .await;
    assert_eq!(200, response.status().as_u16());

    // The stored order matches what the endpoint answered.
    assert_eq!(
        titles_and_indices(&app, &username).await,
        expected(&[("A", 0), ("D", 1), ("B", 2), ("C", 3)])
    );
    app.delete_profile(&username).await;
}

#[tokio::test]
async fn reorder_with_an_unknown_id_is_409_and_changes_nothing() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;
    let username = app.create_profile().await;
    let ids = app.create_links(&username, &["A", "B"]).await;

    let response = app
        .post_json(
            &format!("/profiles/{username}/links/reorder"),
            &json!({ "moved_id": uuid::Uuid::new_v4(), "target_id": ids[0] }),
        )
        .await;
    assert_eq!(409, response.status().as_u16());
    assert_eq!(
        titles_and_indices(&app, &username).await,
        expected(&[("A", 0), ("B", 1)])
    );
    app.delete_profile(&username).await;
}

#[tokio::test]
async fn deleting_a_link_compacts_the_others() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;
    let username = app.create_profile().await;
    let ids = app.create_links(&username, &["A", "B", "C"]).await;

    let response = app
        .delete(&format!("/profiles/{username}/links/{}", ids[0]))
        .await;
    assert_eq!(204, response.status().as_u16());
    assert_eq!(
        titles_and_indices(&app, &username).await,
        expected(&[("B", 0), ("C", 1)])
    );

    // A link added afterwards goes to the end without clashing.
    app.create_links(&username, &["D"]).await;
    assert_eq!(
        titles_and_indices(&app, &username).await,
        expected(&[("B", 0), ("C", 1), ("D", 2)])
    );
    app.delete_profile(&username).await;
}

#[tokio::test]
async fn toggle_flips_the_active_flag() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;
    let username = app.create_profile().await;
    let ids = app.create_links(&username, &["A"]).await;
    let path = format!("/profiles/{username}/links/{}/toggle", ids[0]);

    let body: Value = app.post_empty(&path).await.json().await.unwrap();
    assert_eq!(body["is_active"], false);
    assert_eq!(body["order_index"], 0);

    let body: Value = app.post_empty(&path).await.json().await.unwrap();
    assert_eq!(body["is_active"], true);
    app.delete_profile(&username).await;
}

#[tokio::test]
async fn link_can_be_edited() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;
    let username = app.create_profile().await;
    let ids = app.create_links(&username, &["A"]).await;

    let response = app
        .api_client
        .patch(&format!(
            "{}/profiles/{username}/links/{}",
            app.address, ids[0]
        ))
        .json(&json!({ "title": "GitHub", "icon": "github" }))
        .send()
        .await
        .unwrap();
    assert_eq!(200, response.status().as_u16());

    let body: Value = app
        .get(&format!("/profiles/{username}/links"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body[0]["title"], "GitHub");
    assert_eq!(body[0]["icon"], "github");
    assert_eq!(body[0]["domain"], "example.com");
    app.delete_profile(&username).await;
}

#[tokio::test]
async fn racing_create_and_delete_keep_indices_contiguous() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;
    let username = app.create_profile().await;
    let links_path = format!("/profiles/{username}/links");

    for round in 0..10 {
        let ids = app.create_links(&username, &["A", "B", "C"]).await;
        let new_link = json!({
            "title": format!("New {round}"),
            "url": "https://example.com/new",
        });
        let delete_path = format!("{links_path}/{}", ids[0]);
        let (created, deleted) = tokio::join!(
            app.post_json(&links_path, &new_link),
            app.delete(&delete_path),
        );
        assert_eq!(201, created.status().as_u16());
        assert_eq!(204, deleted.status().as_u16());

        let indices: Vec<u64> = titles_and_indices(&app, &username)
            .await
            .into_iter()
            .map(|(_, index)| index)
            .collect();
        let expected_indices: Vec<u64> = (0..indices.len() as u64).collect();
        assert_eq!(indices, expected_indices, "gap after round {round}");

        // The list keeps accepting new links.
        app.create_links(&username, &["Next"]).await;
    }
    app.delete_profile(&username).await;
}

#[tokio::test]
async fn racing_reorders_both_apply_in_turn() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;
    let username = app.create_profile().await;
    let ids = app.create_links(&username, &["A", "B", "C", "D"]).await;
    let reorder_path = format!("/profiles/{username}/links/reorder");

    for _ in 0..10 {
        let first_body = json!({ "moved_id": ids[3], "target_id": ids[1] });
        let second_body = json!({ "moved_id": ids[0], "target_id": ids[2] });
        let (first, second) = tokio::join!(
            app.post_json(&reorder_path, &first_body),
            app.post_json(&reorder_path, &second_body),
        );
        assert_eq!(200, first.status().as_u16());
        assert_eq!(200, second.status().as_u16());

        let indices: Vec<u64> = titles_and_indices(&app, &username)
            .await
            .into_iter()
            .map(|(_, index)| index)
            .collect();
        assert_eq!(indices, [0, 1, 2, 3]);
    }
    app.delete_profile(&username).await;
}

#[tokio::test]
async fn unknown_link_in_the_path_is_404() {
    let app = spawn_app_locally(Settings::load_configuration().unwrap()).await;
    let username = app.create_profile().await;
    app.create_links(&username, &["A"]).await;
    let path = format!("/profiles/{username}/links/{}", uuid::Uuid::new_v4());

    let response = app.post_empty(&format!("{path}/toggle")).await;
    assert_eq!(404, response.status().as_u16());

    let response = app.delete(&path).await;
    assert_eq!(404, response.status().as_u16());

    let response = app
        .api_client
        .patch(&format!("{}{path}", app.address))
        .json(&json!({ "title": "B" }))
        .send()
        .await
        .unwrap();
    assert_eq!(404, response.status().as_u16());

    app.delete_profile(&username).await;
}
