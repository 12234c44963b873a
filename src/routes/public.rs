use axum::extract::Path;
use axum::Json;
use http::header::{HeaderName, REFERER, USER_AGENT};
use http::HeaderMap;
use serde::Serialize;
use time::OffsetDateTime;

// ───── Current Crate Imports ────────────────────────────────────────────── //

use crate::connection_pool::DatabaseConnection;
use crate::domain::{LinkId, Profile};
use crate::queries;
use crate::queries::analytics::Visit;

use super::links::LinkView;
use super::{profile_or_404, ApiError};

// ───── Body ─────────────────────────────────────────────────────────────── //

#[derive(Serialize, Debug)]
pub struct PublicPage {
    #[serde(flatten)]
    profile: Profile,
    links: Vec<LinkView>,
}

#[derive(Serialize, Debug)]
pub struct ClickTarget {
    url: String,
}

/// The page visitors see: only links that are active and inside their
/// schedule, in display order. Every fetch counts as a page view.
#[tracing::instrument(name = "Render public page", skip(client, headers))]
pub async fn get_public_page(
    DatabaseConnection(client): DatabaseConnection,
    Path(username): Path<String>,
    headers: HeaderMap,
) -> Result<Json<PublicPage>, ApiError> {
    let profile = profile_or_404(&client, &username).await?;
    let now = OffsetDateTime::now_utc();
    let links: Vec<LinkView> = queries::links::list_links(&client, profile.id)
        .await?
        .into_iter()
        .filter(|l| l.is_visible_at(now))
        .map(LinkView::from)
        .collect();

    let visit = visit_from_headers(&headers, None);
    // Losing a page view must not break the page.
    if let Err(e) =
        queries::analytics::record_visit(&client, profile.id, &visit).await
    {
        tracing::error!("Failed to track view: {:?}", e);
    }

    Ok(Json(PublicPage { profile, links }))
}

/// Records a click on a visible link and hands back where to go.
#[tracing::instrument(name = "Record link click", skip(client, headers))]
pub async fn record_click(
    DatabaseConnection(client): DatabaseConnection,
    Path((username, link_id)): Path<(String, LinkId)>,
    headers: HeaderMap,
) -> Result<Json<ClickTarget>, ApiError> {
    let profile = profile_or_404(&client, &username).await?;
    let now = OffsetDateTime::now_utc();
    let link = queries::links::list_links(&client, profile.id)
        .await?
        .into_iter()
        .find(|l| l.id == link_id && l.is_visible_at(now))
        .ok_or_else(|| {
            ApiError::NotFound(format!("Link {link_id} is not available"))
        })?;

    let visit = visit_from_headers(&headers, Some(link.id));
    queries::analytics::record_visit(&client, profile.id, &visit).await?;
    Ok(Json(ClickTarget {
        url: link.url.as_ref().to_string(),
    }))
}

// ───── Helpers ──────────────────────────────────────────────────────────── //

fn visit_from_headers(headers: &HeaderMap, link_id: Option<LinkId>) -> Visit {
    let header = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Visit {
        link_id,
        referrer: header(REFERER),
        user_agent: header(USER_AGENT),
    }
}
