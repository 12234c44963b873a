use anyhow::{anyhow, Context};
use tokio_postgres::{Client, Row, Transaction};
use uuid::Uuid;

use crate::domain::{
    Link, LinkIcon, LinkId, LinkTitle, LinkUrl, OrderUpdate, Schedule,
};

// ───── Body ─────────────────────────────────────────────────────────────── //

const LINK_COLUMNS: &str = "id, title, url, icon, order_index, is_active, \
                            scheduled_start, scheduled_end";

/// All links of a profile in display order.
#[tracing::instrument(name = "Get links of profile", skip(client))]
pub async fn list_links(
    client: &Client,
    profile_id: Uuid,
) -> Result<Vec<Link>, anyhow::Error> {
    client
        .query(&select_links_sql(), &[&profile_id])
        .await
        .context("Failed to fetch links")?
        .iter()
        .map(link_from_row)
        .collect()
}

/// Takes the profile's row lock and reads its links. Every change to the
/// list goes through here, so concurrent edits of one profile queue up
/// instead of computing indices from a stale list.
///
/// `None` when the profile is gone.
#[tracing::instrument(name = "Lock links of profile", skip(transaction))]
pub async fn lock_links(
    transaction: &Transaction<'_>,
    profile_id: Uuid,
) -> Result<Option<Vec<Link>>, anyhow::Error> {
    let locked = transaction
        .query_opt(
            "SELECT 1 FROM profiles WHERE id = $1 FOR UPDATE",
            &[&profile_id],
        )
        .await
        .context("Failed to lock profile")?;
    if locked.is_none() {
        return Ok(None);
    }
    transaction
        .query(&select_links_sql(), &[&profile_id])
        .await
        .context("Failed to fetch links")?
        .iter()
        .map(link_from_row)
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

#[tracing::instrument(
    name = "Saving new link",
    skip(transaction, link),
    fields(link_id = %link.id)
)]
pub async fn insert_link(
    transaction: &Transaction<'_>,
    profile_id: Uuid,
    link: &Link,
) -> Result<(), anyhow::Error> {
    transaction
        .execute(
            "INSERT INTO links (id, profile_id, title, url, icon, order_index, \
             is_active, scheduled_start, scheduled_end) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            &[
                &link.id,
                &profile_id,
                &link.title.as_ref(),
                &link.url.as_ref(),
                &link.icon,
                &order_index_to_sql(link.order_index)?,
                &link.is_active,
                &link.schedule.and_then(|s| s.start()),
                &link.schedule.and_then(|s| s.end()),
            ],
        )
        .await
        .context("Failed to insert link")?;
    Ok(())
}

/// Overwrites the editable columns. `order_index` is only changed through
/// [`save_order`].
#[tracing::instrument(
    name = "Update link",
    skip(transaction, link),
    fields(link_id = %link.id)
)]
pub async fn update_link(
    transaction: &Transaction<'_>,
    profile_id: Uuid,
    link: &Link,
) -> Result<(), anyhow::Error> {
    let updated = transaction
        .execute(
            "UPDATE links SET title = $3, url = $4, icon = $5, is_active = $6, \
             scheduled_start = $7, scheduled_end = $8, updated_at = now() \
             WHERE id = $1 AND profile_id = $2",
            &[
                &link.id,
                &profile_id,
                &link.title.as_ref(),
                &link.url.as_ref(),
                &link.icon,
                &link.is_active,
                &link.schedule.and_then(|s| s.start()),
                &link.schedule.and_then(|s| s.end()),
            ],
        )
        .await
        .context("Failed to update link")?;
    if updated != 1 {
        return Err(anyhow!("Link {} vanished during update", link.id));
    }
    Ok(())
}

/// Writes new positions. Rows may collide on the way, the unique index
/// is only checked when the transaction commits.
#[tracing::instrument(name = "Save link order", skip(transaction, updates))]
pub async fn save_order(
    transaction: &Transaction<'_>,
    profile_id: Uuid,
    updates: &[OrderUpdate],
) -> Result<(), anyhow::Error> {
    let statement = transaction
        .prepare(
            "UPDATE links SET order_index = $1, updated_at = now() \
             WHERE id = $2 AND profile_id = $3",
        )
        .await
        .context("Failed to prepare order update")?;

    for update in updates {
        let changed = transaction
            .execute(
                &statement,
                &[
                    &order_index_to_sql(update.order_index)?,
                    &update.id,
                    &profile_id,
                ],
            )
            .await
            .with_context(|| format!("Failed to move link {}", update.id))?;
        if changed != 1 {
            // Dropping the transaction rolls every earlier row back.
            tracing::warn!("Link {} is not stored anymore", update.id);
            return Err(anyhow!("Link {} is not stored anymore", update.id));
        }
    }
    tracing::info!("Moved {} links", updates.len());
    Ok(())
}

#[tracing::instrument(name = "Delete link", skip(transaction))]
pub async fn delete_link(
    transaction: &Transaction<'_>,
    profile_id: Uuid,
    link_id: LinkId,
) -> Result<(), anyhow::Error> {
    let deleted = transaction
        .execute(
            "DELETE FROM links WHERE id = $1 AND profile_id = $2",
            &[&link_id, &profile_id],
        )
        .await
        .context("Failed to delete link")?;
    if deleted != 1 {
        return Err(anyhow!("Link {link_id} vanished before deletion"));
    }
    Ok(())
}

// ───── Helpers ──────────────────────────────────────────────────────────── //

fn select_links_sql() -> String {
    format!(
        "SELECT {LINK_COLUMNS} FROM links WHERE profile_id = $1 \
         ORDER BY order_index ASC, created_at ASC"
    )
}

fn order_index_to_sql(index: u32) -> Result<i32, anyhow::Error> {
    i32::try_from(index).context("Order index does not fit the column")
}

fn link_from_row(row: &Row) -> Result<Link, anyhow::Error> {
    let title: &str = row.get("title");
    let url: &str = row.get("url");
    let icon: LinkIcon = row.get("icon");
    let order_index: i32 = row.get("order_index");

    Ok(Link {
        id: row.get("id"),
        title: LinkTitle::parse(title)?,
        url: LinkUrl::parse(url)?,
        icon,
        order_index: u32::try_from(order_index)
            .context("Stored order index is negative")?,
        is_active: row.get("is_active"),
        schedule: Schedule::new(
            row.get("scheduled_start"),
            row.get("scheduled_end"),
        )?,
    })
}
