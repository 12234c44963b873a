use anyhow::Context;
use time::OffsetDateTime;
use tokio_postgres::Client;
use uuid::Uuid;

use crate::domain::ClickEvent;

// ───── Body ─────────────────────────────────────────────────────────────── //

/// Request metadata stored with every visit.
#[derive(Debug, Default, Clone)]
pub struct Visit {
    /// `None` for a page view.
    pub link_id: Option<Uuid>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
}

#[tracing::instrument(name = "Record visit", skip(client))]
pub async fn record_visit(
    client: &Client,
    profile_id: Uuid,
    visit: &Visit,
) -> Result<(), anyhow::Error> {
    client
        .execute(
            "INSERT INTO analytics (id, profile_id, link_id, referrer, user_agent) \
             VALUES ($1, $2, $3, $4, $5)",
            &[
                &Uuid::new_v4(),
                &profile_id,
                &visit.link_id,
                &visit.referrer,
                &visit.user_agent,
            ],
        )
        .await
        .context("Failed to record visit")?;
    Ok(())
}

/// Visits of a profile, newest first, joined with the current link titles.
#[tracing::instrument(name = "Get visits of profile", skip(client))]
pub async fn load_events(
    client: &Client,
    profile_id: Uuid,
    since: Option<OffsetDateTime>,
) -> Result<Vec<ClickEvent>, anyhow::Error> {
    let rows = client
        .query(
            "SELECT a.link_id, l.title, a.referrer, a.clicked_at \
             FROM analytics a LEFT JOIN links l ON l.id = a.link_id \
             WHERE a.profile_id = $1 AND ($2::timestamptz IS NULL OR a.clicked_at >= $2) \
             ORDER BY a.clicked_at DESC",
            &[&profile_id, &since],
        )
        .await
        .context("Failed to fetch analytics")?;

    Ok(rows
        .iter()
        .map(|row| ClickEvent {
            link_id: row.get("link_id"),
            link_title: row.get("title"),
            referrer: row.get("referrer"),
            clicked_at: row.get("clicked_at"),
        })
        .collect())
}
