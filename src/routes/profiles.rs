use axum::extract::{Path, State};
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// ───── Current Crate Imports ────────────────────────────────────────────── //

use crate::connection_pool::DatabaseConnection;
use crate::domain::link_preview::qr_code_url;
use crate::domain::{
    AvatarUrl, Bio, ClickEvent, DisplayName, Link, Profile, Theme, Username,
};
use crate::queries;
use crate::startup::ApplicationBaseUrl;

use super::links::LinkView;
use super::{profile_or_404, ApiError};

// ───── Body ─────────────────────────────────────────────────────────────── //

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct NewProfileData {
    username: String,
}

/// Fields left out are kept as they are. Empty strings clear optional text.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ProfileChanges {
    username: Option<String>,
    display_name: Option<String>,
    bio: Option<String>,
    avatar_url: Option<String>,
    theme: Option<Theme>,
}

#[derive(Serialize, Debug)]
pub struct ProfileView {
    #[serde(flatten)]
    profile: Profile,
    links: Vec<LinkView>,
}

#[derive(Serialize, Debug)]
pub struct QrCode {
    profile_url: String,
    qr_code_url: String,
}

/// Everything stored for one profile, as handed out by the data export.
#[derive(Serialize, Debug)]
pub struct ProfileExport {
    profile: Profile,
    links: Vec<Link>,
    analytics: Vec<ClickEvent>,
    #[serde(with = "time::serde::rfc3339")]
    exported_at: OffsetDateTime,
}

#[tracing::instrument(
    name = "Adding a new profile",
    skip(client, body),
    fields(username = %body.username)
)]
pub async fn create_profile(
    DatabaseConnection(client): DatabaseConnection,
    Json(body): Json<NewProfileData>,
) -> Result<(StatusCode, Json<Profile>), ApiError> {
    let username = Username::parse(&body.username)?;
    let id = uuid::Uuid::new_v4();

    let profile =
        match queries::profiles::insert_profile(&client, id, &username).await {
            Ok(p) => p,
            Err(e) if queries::is_unique_violation(&e) => {
                return Err(username_taken(&username));
            }
            Err(e) => return Err(e.into()),
        };
    tracing::info!("Profile {} has been created", profile.id);
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Dashboard view: the profile with every link, hidden ones included.
#[tracing::instrument(name = "Get profile", skip(client))]
pub async fn get_profile(
    DatabaseConnection(client): DatabaseConnection,
    Path(username): Path<String>,
) -> Result<Json<ProfileView>, ApiError> {
    let profile = profile_or_404(&client, &username).await?;
    let links = queries::links::list_links(&client, profile.id).await?;
    Ok(Json(ProfileView {
        profile,
        links: links.into_iter().map(LinkView::from).collect(),
    }))
}

#[tracing::instrument(name = "Update profile", skip(client, changes))]
pub async fn update_profile(
    DatabaseConnection(client): DatabaseConnection,
    Path(username): Path<String>,
    Json(changes): Json<ProfileChanges>,
) -> Result<Json<Profile>, ApiError> {
    let profile = profile_or_404(&client, &username).await?;
    let updated = apply_changes(profile, changes)?;

    match queries::profiles::update_profile(&client, &updated).await {
        Ok(p) => Ok(Json(p)),
        Err(e) if queries::is_unique_violation(&e) => {
            Err(username_taken(&updated.username))
        }
        Err(e) => Err(e.into()),
    }
}

/// Deletes the profile together with its links and analytics.
#[tracing::instrument(name = "Delete profile", skip(client))]
pub async fn delete_profile(
    DatabaseConnection(client): DatabaseConnection,
    Path(username): Path<String>,
) -> Result<StatusCode, ApiError> {
    let profile = profile_or_404(&client, &username).await?;
    if !queries::profiles::delete_profile(&client, profile.id).await? {
        return Err(ApiError::NotFound(format!(
            "Profile {username} does not exist"
        )));
    }
    tracing::info!("Profile {} has been deleted", profile.id);
    Ok(StatusCode::NO_CONTENT)
}

/// Profile, links and the complete visit history in one document.
#[tracing::instrument(name = "Export profile data", skip(client))]
pub async fn export_profile(
    DatabaseConnection(client): DatabaseConnection,
    Path(username): Path<String>,
) -> Result<Json<ProfileExport>, ApiError> {
    let profile = profile_or_404(&client, &username).await?;
    let links = queries::links::list_links(&client, profile.id).await?;
    let analytics =
        queries::analytics::load_events(&client, profile.id, None).await?;
    Ok(Json(ProfileExport {
        profile,
        links,
        analytics,
        exported_at: OffsetDateTime::now_utc(),
    }))
}

/// Link to the public page and a QR image pointing to it.
#[tracing::instrument(name = "Get QR code", skip(client, base_url))]
pub async fn get_qr_code(
    State(base_url): State<ApplicationBaseUrl>,
    DatabaseConnection(client): DatabaseConnection,
    Path(username): Path<String>,
) -> Result<Json<QrCode>, ApiError> {
    let profile = profile_or_404(&client, &username).await?;
    let profile_url = format!(
        "{}/u/{}",
        base_url.0.trim_end_matches('/'),
        profile.username
    );
    Ok(Json(QrCode {
        qr_code_url: qr_code_url(&profile_url),
        profile_url,
    }))
}

// ───── Helpers ──────────────────────────────────────────────────────────── //

fn apply_changes(
    mut profile: Profile,
    changes: ProfileChanges,
) -> Result<Profile, ApiError> {
    if let Some(username) = changes.username {
        profile.username = Username::parse(&username)?;
    }
    if let Some(display_name) = changes.display_name {
        profile.display_name = DisplayName::parse(&display_name)?;
    }
    if let Some(bio) = changes.bio {
        profile.bio = Bio::parse(&bio)?;
    }
    if let Some(avatar_url) = changes.avatar_url {
        profile.avatar_url = AvatarUrl::parse(&avatar_url)?;
    }
    if let Some(theme) = changes.theme {
        profile.theme = theme;
    }
    Ok(profile)
}

fn username_taken(username: &Username) -> ApiError {
    ApiError::Conflict(format!("Username {username} is already taken"))
}
