use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

// ───── Body ─────────────────────────────────────────────────────────────── //

pub type LinkId = Uuid;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("Title is required")]
    EmptyTitle,
    #[error("Title must be less than 100 characters")]
    TitleTooLong,
    #[error("{0} is not a valid URL")]
    InvalidUrl(String),
    #[error("Scheduled start must not be after scheduled end")]
    InvertedSchedule,
}

/// A single outbound link on a profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub id: LinkId,
    pub title: LinkTitle,
    pub url: LinkUrl,
    pub icon: LinkIcon,
    /// Display position, ascending. Contiguous `0..N` within one profile
    /// after every reorder pass.
    pub order_index: u32,
    pub is_active: bool,
    pub schedule: Option<Schedule>,
}

impl Link {
    /// Public pages only show links that are active and inside their
    /// visibility window.
    pub fn is_visible_at(&self, now: OffsetDateTime) -> bool {
        self.is_active
            && self.schedule.map_or(true, |s| s.contains(now))
    }
}

/// This type guarantees that a link title is non-empty and short enough
/// to render as a button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LinkTitle(String);

impl LinkTitle {
    pub fn parse(title: &str) -> Result<LinkTitle, LinkError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            Err(LinkError::EmptyTitle)
        } else if trimmed.chars().count() > 100 {
            Err(LinkError::TitleTooLong)
        } else {
            Ok(LinkTitle(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for LinkTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Absolute URL a link points to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LinkUrl(String);

impl LinkUrl {
    pub fn parse(url: &str) -> Result<LinkUrl, LinkError> {
        let trimmed = url.trim();
        if validator::validate_url(trimmed) {
            Ok(LinkUrl(trimmed.to_string()))
        } else {
            Err(LinkError::InvalidUrl(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for LinkUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Icon shown next to the link title.
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
#[postgres(name = "link_icon")]
pub enum LinkIcon {
    #[postgres(name = "instagram")]
    Instagram,
    #[postgres(name = "twitter")]
    Twitter,
    #[postgres(name = "linkedin")]
    Linkedin,
    #[postgres(name = "github")]
    Github,
    #[postgres(name = "youtube")]
    Youtube,
    #[postgres(name = "facebook")]
    Facebook,
    #[postgres(name = "website")]
    Website,
    #[postgres(name = "email")]
    Email,
    #[default]
    #[postgres(name = "custom")]
    Custom,
}

/// Optional visibility window. Open ends are unbounded, bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Schedule {
    #[serde(with = "time::serde::rfc3339::option")]
    start: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    end: Option<OffsetDateTime>,
}

impl Schedule {
    /// Returns `Ok(None)` when neither bound is set.
    pub fn new(
        start: Option<OffsetDateTime>,
        end: Option<OffsetDateTime>,
    ) -> Result<Option<Schedule>, LinkError> {
        match (start, end) {
            (None, None) => Ok(None),
            (Some(s), Some(e)) if s > e => Err(LinkError::InvertedSchedule),
            _ => Ok(Some(Schedule { start, end })),
        }
    }

    pub fn start(&self) -> Option<OffsetDateTime> {
        self.start
    }

    pub fn end(&self) -> Option<OffsetDateTime> {
        self.end
    }

    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.start.map_or(true, |s| s <= instant)
            && self.end.map_or(true, |e| instant <= e)
    }
}

// ───── Unit tests ───────────────────────────────────────────────────────── //
