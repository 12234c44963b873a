use anyhow::Context;
use axum::extract::Path;
use axum::Json;
use deadpool_postgres::Transaction;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

// ───── Current Crate Imports ────────────────────────────────────────────── //

use crate::connection_pool::DatabaseConnection;
use crate::domain::link_order;
use crate::domain::link_preview::{extract_domain, favicon_url};
use crate::domain::{
    Link, LinkIcon, LinkId, LinkTitle, LinkUrl, OrderingError, Schedule,
};
use crate::queries;

use super::{profile_or_404, ApiError};

// ───── Body ─────────────────────────────────────────────────────────────── //

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct NewLinkData {
    title: String,
    url: String,
    #[serde(default)]
    icon: LinkIcon,
    #[serde(default = "default_active")]
    is_active: bool,
    #[serde(default)]
    schedule: Option<ScheduleData>,
}

/// Fields left out are kept as they are. A `schedule` with both bounds
/// `null` removes the window.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct LinkChanges {
    title: Option<String>,
    url: Option<String>,
    icon: Option<LinkIcon>,
    is_active: Option<bool>,
    schedule: Option<ScheduleData>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ScheduleData {
    #[serde(default, with = "time::serde::rfc3339::option")]
    start: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    end: Option<OffsetDateTime>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct ReorderRequest {
    moved_id: LinkId,
    target_id: LinkId,
}

/// Link as sent to clients, with preview data derived from its URL.
#[derive(Serialize, Debug)]
pub struct LinkView {
    #[serde(flatten)]
    link: Link,
    domain: Option<String>,
    favicon: Option<String>,
}

impl From<Link> for LinkView {
    fn from(link: Link) -> Self {
        LinkView {
            domain: extract_domain(link.url.as_ref()),
            favicon: favicon_url(link.url.as_ref()),
            link,
        }
    }
}

#[tracing::instrument(name = "List links", skip(client))]
pub async fn list_links(
    DatabaseConnection(client): DatabaseConnection,
    Path(username): Path<String>,
) -> Result<Json<Vec<LinkView>>, ApiError> {
    let profile = profile_or_404(&client, &username).await?;
    let links = queries::links::list_links(&client, profile.id).await?;
    Ok(Json(into_views(links)))
}

/// New links are appended after the existing ones.
#[tracing::instrument(name = "Adding a new link", skip(client, body))]
pub async fn create_link(
    DatabaseConnection(mut client): DatabaseConnection,
    Path(username): Path<String>,
    Json(body): Json<NewLinkData>,
) -> Result<(StatusCode, Json<LinkView>), ApiError> {
    let profile = profile_or_404(&client, &username).await?;
    let link = Link {
        id: Uuid::new_v4(),
        title: LinkTitle::parse(&body.title)?,
        url: LinkUrl::parse(&body.url)?,
        icon: body.icon,
        order_index: 0,
        is_active: body.is_active,
        schedule: parse_schedule(body.schedule)?,
    };

    let transaction = begin(&mut client).await?;
    let links = lock_links(&transaction, profile.id, &username).await?;
    let link = link_order::append(&links, link)
        .pop()
        .ok_or_else(|| anyhow::anyhow!("Appended link disappeared"))?;
    queries::links::insert_link(&transaction, profile.id, &link)
        .await
        .map_err(concurrent_change)?;
    commit(transaction).await?;

    tracing::info!("Link {} added at index {}", link.id, link.order_index);
    Ok((StatusCode::CREATED, Json(LinkView::from(link))))
}

#[tracing::instrument(name = "Edit link", skip(client, changes))]
pub async fn update_link(
    DatabaseConnection(mut client): DatabaseConnection,
    Path((username, link_id)): Path<(String, LinkId)>,
    Json(changes): Json<LinkChanges>,
) -> Result<Json<LinkView>, ApiError> {
    let profile = profile_or_404(&client, &username).await?;
    let transaction = begin(&mut client).await?;
    let links = lock_links(&transaction, profile.id, &username).await?;
    let link = find_link(&links, link_id)?;

    let updated = apply_changes(link.clone(), changes)?;
    queries::links::update_link(&transaction, profile.id, &updated).await?;
    commit(transaction).await?;
    Ok(Json(LinkView::from(updated)))
}

#[tracing::instrument(name = "Toggle link", skip(client))]
pub async fn toggle_link(
    DatabaseConnection(mut client): DatabaseConnection,
    Path((username, link_id)): Path<(String, LinkId)>,
) -> Result<Json<LinkView>, ApiError> {
    let profile = profile_or_404(&client, &username).await?;
    let transaction = begin(&mut client).await?;
    let links = lock_links(&transaction, profile.id, &username).await?;
    let toggled =
        link_order::toggle_active(&links, link_id).map_err(link_not_found)?;
    let link = find_link(&toggled, link_id)?.clone();

    queries::links::update_link(&transaction, profile.id, &link).await?;
    commit(transaction).await?;
    tracing::info!("Link {} is_active = {}", link.id, link.is_active);
    Ok(Json(LinkView::from(link)))
}

/// Deleting compacts the indices of the remaining links.
#[tracing::instrument(name = "Remove link", skip(client))]
pub async fn delete_link(
    DatabaseConnection(mut client): DatabaseConnection,
    Path((username, link_id)): Path<(String, LinkId)>,
) -> Result<StatusCode, ApiError> {
    let profile = profile_or_404(&client, &username).await?;
    let transaction = begin(&mut client).await?;
    let links = lock_links(&transaction, profile.id, &username).await?;
    let remaining =
        link_order::remove(&links, link_id).map_err(link_not_found)?;
    let compacted = link_order::reindex(&remaining);
    let updates = link_order::order_updates(&remaining, &compacted);

    queries::links::delete_link(&transaction, profile.id, link_id).await?;
    queries::links::save_order(&transaction, profile.id, &updates).await?;
    commit(transaction).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Drag and drop: `moved_id` takes the slot of `target_id`.
#[tracing::instrument(name = "Reorder links", skip(client))]
pub async fn reorder_links(
    DatabaseConnection(mut client): DatabaseConnection,
    Path(username): Path<String>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<Vec<LinkView>>, ApiError> {
    let profile = profile_or_404(&client, &username).await?;
    let transaction = begin(&mut client).await?;
    let links = lock_links(&transaction, profile.id, &username).await?;
    let reordered =
        link_order::reorder(&links, request.moved_id, request.target_id)?;
    let updates = link_order::order_updates(&links, &reordered);

    queries::links::save_order(&transaction, profile.id, &updates).await?;
    commit(transaction).await?;
    Ok(Json(into_views(reordered)))
}

/// Restores contiguous indices without moving anything.
#[tracing::instrument(name = "Compact links", skip(client))]
pub async fn compact_links(
    DatabaseConnection(mut client): DatabaseConnection,
    Path(username): Path<String>,
) -> Result<Json<Vec<LinkView>>, ApiError> {
    let profile = profile_or_404(&client, &username).await?;
    let transaction = begin(&mut client).await?;
    let links = lock_links(&transaction, profile.id, &username).await?;
    let compacted = link_order::reindex(&links);
    let updates = link_order::order_updates(&links, &compacted);

    queries::links::save_order(&transaction, profile.id, &updates).await?;
    commit(transaction).await?;
    Ok(Json(into_views(compacted)))
}

// ───── Helpers ──────────────────────────────────────────────────────────── //

fn default_active() -> bool {
    true
}

fn into_views(links: Vec<Link>) -> Vec<LinkView> {
    links.into_iter().map(LinkView::from).collect()
}

async fn begin(
    client: &mut deadpool_postgres::Client,
) -> Result<Transaction<'_>, ApiError> {
    Ok(client
        .transaction()
        .await
        .context("Failed to begin transaction")?)
}

async fn commit(transaction: Transaction<'_>) -> Result<(), ApiError> {
    transaction
        .commit()
        .await
        .context("Failed to commit link changes")
        .map_err(concurrent_change)
}

async fn lock_links(
    transaction: &Transaction<'_>,
    profile_id: Uuid,
    username: &str,
) -> Result<Vec<Link>, ApiError> {
    queries::links::lock_links(transaction, profile_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Profile {username} does not exist"))
        })
}

/// A unique index rejecting the write means another request moved links
/// first.
fn concurrent_change(e: anyhow::Error) -> ApiError {
    if queries::is_unique_violation(&e) {
        ApiError::Conflict(
            "Links were changed concurrently, reload and retry".into(),
        )
    } else {
        e.into()
    }
}

/// A link id taken from the path is a missing resource, not a stale list.
fn link_not_found(e: OrderingError) -> ApiError {
    match e {
        OrderingError::UnknownId(link_id) => not_found(link_id),
    }
}

fn not_found(link_id: LinkId) -> ApiError {
    ApiError::NotFound(format!("Link {link_id} not found"))
}

fn find_link(links: &[Link], link_id: LinkId) -> Result<&Link, ApiError> {
    links
        .iter()
        .find(|l| l.id == link_id)
        .ok_or_else(|| not_found(link_id))
}

fn parse_schedule(
    data: Option<ScheduleData>,
) -> Result<Option<Schedule>, ApiError> {
    match data {
        Some(ScheduleData { start, end }) => Ok(Schedule::new(start, end)?),
        None => Ok(None),
    }
}

fn apply_changes(mut link: Link, changes: LinkChanges) -> Result<Link, ApiError> {
    if let Some(title) = changes.title {
        link.title = LinkTitle::parse(&title)?;
    }
    if let Some(url) = changes.url {
        link.url = LinkUrl::parse(&url)?;
    }
    if let Some(icon) = changes.icon {
        link.icon = icon;
    }
    if let Some(is_active) = changes.is_active {
        link.is_active = is_active;
    }
    if changes.schedule.is_some() {
        link.schedule = parse_schedule(changes.schedule)?;
    }
    Ok(link)
}
