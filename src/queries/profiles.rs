use anyhow::{anyhow, Context};
use tokio_postgres::{Client, Row};
use uuid::Uuid;

use crate::domain::{
    AvatarUrl, Bio, DisplayName, Profile, Theme, Username,
};

// ───── Body ─────────────────────────────────────────────────────────────── //

const PROFILE_COLUMNS: &str =
    "id, username, display_name, bio, avatar_url, theme";

#[tracing::instrument(name = "Saving new profile", skip(client))]
pub async fn insert_profile(
    client: &Client,
    id: Uuid,
    username: &Username,
) -> Result<Profile, anyhow::Error> {
    let row = client
        .query_one(
            &format!(
                "INSERT INTO profiles (id, username) VALUES ($1, $2) \
                 RETURNING {PROFILE_COLUMNS}"
            ),
            &[&id, &username.as_ref()],
        )
        .await
        .context("Failed to insert profile")?;
    profile_from_row(&row)
}

#[tracing::instrument(name = "Get profile by username", skip(client))]
pub async fn find_by_username(
    client: &Client,
    username: &Username,
) -> Result<Option<Profile>, anyhow::Error> {
    let row = client
        .query_opt(
            &format!(
                "SELECT {PROFILE_COLUMNS} FROM profiles WHERE username = $1"
            ),
            &[&username.as_ref()],
        )
        .await
        .context("Failed to fetch profile")?;
    row.as_ref().map(profile_from_row).transpose()
}

#[tracing::instrument(name = "Check username availability", skip(client))]
pub async fn username_taken(
    client: &Client,
    username: &Username,
) -> Result<bool, anyhow::Error> {
    let row = client
        .query_one(
            "SELECT EXISTS (SELECT 1 FROM profiles WHERE username = $1)",
            &[&username.as_ref()],
        )
        .await
        .context("Failed to check username availability")?;
    Ok(row.get(0))
}

/// Overwrites every editable column of a stored profile.
#[tracing::instrument(
    name = "Update profile",
    skip(client, profile),
    fields(profile_id = %profile.id)
)]
pub async fn update_profile(
    client: &Client,
    profile: &Profile,
) -> Result<Profile, anyhow::Error> {
    let display_name: Option<&str> =
        profile.display_name.as_ref().map(|d| d.as_ref());
    let bio: Option<&str> = profile.bio.as_ref().map(|b| b.as_ref());
    let avatar_url: Option<&str> =
        profile.avatar_url.as_ref().map(|a| a.as_ref());

    let row = client
        .query_one(
            &format!(
                "UPDATE profiles SET username = $2, display_name = $3, \
                 bio = $4, avatar_url = $5, theme = $6, updated_at = now() \
                 WHERE id = $1 RETURNING {PROFILE_COLUMNS}"
            ),
            &[
                &profile.id,
                &profile.username.as_ref(),
                &display_name,
                &bio,
                &avatar_url,
                &profile.theme,
            ],
        )
        .await
        .context("Failed to update profile")?;
    profile_from_row(&row)
}

/// Removes a profile. Links and analytics rows cascade with it.
#[tracing::instrument(name = "Delete profile", skip(client))]
pub async fn delete_profile(
    client: &Client,
    profile_id: Uuid,
) -> Result<bool, anyhow::Error> {
    let deleted = client
        .execute("DELETE FROM profiles WHERE id = $1", &[&profile_id])
        .await
        .context("Failed to delete profile")?;
    Ok(deleted == 1)
}

// ───── Helpers ──────────────────────────────────────────────────────────── //

fn profile_from_row(row: &Row) -> Result<Profile, anyhow::Error> {
    let username: &str = row.get("username");
    let display_name: Option<&str> = row.get("display_name");
    let bio: Option<&str> = row.get("bio");
    let avatar_url: Option<&str> = row.get("avatar_url");
    let theme: Theme = row.get("theme");

    Ok(Profile {
        id: row.get("id"),
        username: Username::parse(username)
            .map_err(|e| anyhow!("Stored username {username:?}: {e}"))?,
        display_name: display_name
            .map(DisplayName::parse)
            .transpose()?
            .flatten(),
        bio: bio.map(Bio::parse).transpose()?.flatten(),
        avatar_url: avatar_url.map(AvatarUrl::parse).transpose()?.flatten(),
        theme,
    })
}
