// ───── Current Crate Imports ────────────────────────────────────────────── //

pub use analytics::get_analytics;
pub use error::ApiError;
pub use health_check::health_check;
pub use links::{
    compact_links, create_link, delete_link, list_links, reorder_links,
    toggle_link, update_link,
};
pub use profiles::{
    create_profile, delete_profile, export_profile, get_profile, get_qr_code,
    update_profile,
};
pub use public::{get_public_page, record_click};
pub use usernames::check_username;

use crate::domain::{Profile, Username};
use crate::queries;

// ───── Submodules ───────────────────────────────────────────────────────── //

mod analytics;
mod error;
mod health_check;
mod links;
mod profiles;
mod public;
mod usernames;

// ───── Helpers ──────────────────────────────────────────────────────────── //

/// Looks a profile up by the username segment of a path. A segment that is
/// not a well-formed username cannot belong to any profile.
async fn profile_or_404(
    client: &tokio_postgres::Client,
    raw_username: &str,
) -> Result<Profile, ApiError> {
    let not_found =
        || ApiError::NotFound(format!("Profile {raw_username} does not exist"));
    let username = Username::parse(raw_username).map_err(|_| not_found())?;
    queries::profiles::find_by_username(client, &username)
        .await?
        .ok_or_else(not_found)
}
