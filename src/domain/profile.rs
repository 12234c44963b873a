use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::username::Username;

// ───── Body ─────────────────────────────────────────────────────────────── //

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Display name must be less than 50 characters")]
    DisplayNameTooLong,
    #[error("Bio must be less than 200 characters")]
    BioTooLong,
    #[error("{0} is not a valid avatar URL")]
    InvalidAvatarUrl(String),
}

/// Owner of a public page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: Username,
    pub display_name: Option<DisplayName>,
    pub bio: Option<Bio>,
    pub avatar_url: Option<AvatarUrl>,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// Blank input means "no display name".
    pub fn parse(name: &str) -> Result<Option<DisplayName>, ProfileError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else if trimmed.chars().count() > 50 {
            Err(ProfileError::DisplayNameTooLong)
        } else {
            Ok(Some(DisplayName(trimmed.to_string())))
        }
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Bio(String);

impl Bio {
    /// Blank input means "no bio".
    pub fn parse(bio: &str) -> Result<Option<Bio>, ProfileError> {
        let trimmed = bio.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else if trimmed.chars().count() > 200 {
            Err(ProfileError::BioTooLong)
        } else {
            Ok(Some(Bio(trimmed.to_string())))
        }
    }
}

impl AsRef<str> for Bio {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AvatarUrl(String);

impl AvatarUrl {
    /// Empty input clears the avatar.
    pub fn parse(url: &str) -> Result<Option<AvatarUrl>, ProfileError> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else if validator::validate_url(trimmed) {
            Ok(Some(AvatarUrl(trimmed.to_string())))
        } else {
            Err(ProfileError::InvalidAvatarUrl(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for AvatarUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Background style of the public page.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSql,
    FromSql,
)]
#[serde(rename_all = "lowercase")]
#[postgres(name = "profile_theme")]
pub enum Theme {
    #[default]
    #[postgres(name = "default")]
    Default,
    #[postgres(name = "ocean")]
    Ocean,
    #[postgres(name = "sunset")]
    Sunset,
    #[postgres(name = "forest")]
    Forest,
    #[postgres(name = "midnight")]
    Midnight,
    #[postgres(name = "minimal")]
    Minimal,
}

// ───── Unit tests ───────────────────────────────────────────────────────── //
