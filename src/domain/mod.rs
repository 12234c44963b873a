// ───── Current Crate Imports ────────────────────────────────────────────── //

pub use analytics::{summarize, AnalyticsSummary, ClickEvent, TimeRange};
pub use link::{
    Link, LinkError, LinkIcon, LinkId, LinkTitle, LinkUrl, Schedule,
};
pub use link_order::{OrderUpdate, OrderingError};
pub use profile::{AvatarUrl, Bio, DisplayName, Profile, ProfileError, Theme};
pub use username::{
    sanitize, validate, Username, UsernameError, UsernameValidation,
};

// ───── Submodules ───────────────────────────────────────────────────────── //

pub mod analytics;
pub mod link_order;
pub mod link_preview;

// Top-level modules
mod link;
mod profile;
mod username;
