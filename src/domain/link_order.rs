//! Pure transforms over a profile's ordered link list.
//!
//! Every function takes the current list by reference and returns a new one,
//! persisting the result is left to the caller.

use serde::Serialize;

use super::link::{Link, LinkId};

// ───── Body ─────────────────────────────────────────────────────────────── //

/// The caller's view of the list diverged from the model. This is a logic
/// fault, not something to show to an end user.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderingError {
    #[error("Link {0} is not part of this list")]
    UnknownId(LinkId),
}

/// New position of a single link, one row update for the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderUpdate {
    pub id: LinkId,
    pub order_index: u32,
}

/// Moves `moved_id` into the slot currently held by `target_id`; links in
/// between shift by one towards the gap. Every `order_index` is reassigned
/// to match the resulting positions.
pub fn reorder(
    links: &[Link],
    moved_id: LinkId,
    target_id: LinkId,
) -> Result<Vec<Link>, OrderingError> {
    if moved_id == target_id {
        return Ok(links.to_vec());
    }

    let from = position_of(links, moved_id)?;
    let to = position_of(links, target_id)?;

    let mut reordered = links.to_vec();
    let moved = reordered.remove(from);
    reordered.insert(to, moved);

    Ok(assign_positions(reordered))
}

/// Flips the active flag of a single link. Order is left untouched.
pub fn toggle_active(
    links: &[Link],
    id: LinkId,
) -> Result<Vec<Link>, OrderingError> {
    let position = position_of(links, id)?;
    let mut toggled = links.to_vec();
    toggled[position].is_active = !toggled[position].is_active;
    Ok(toggled)
}

/// Adds a link at the end of the list.
pub fn append(links: &[Link], mut link: Link) -> Vec<Link> {
    link.order_index = next_order_index(links);
    let mut appended = links.to_vec();
    appended.push(link);
    appended
}

/// Index a freshly created link receives: the current link count.
pub fn next_order_index(links: &[Link]) -> u32 {
    u32::try_from(links.len()).unwrap_or(u32::MAX)
}

/// Drops a link. Remaining indices are not compacted, run [`reindex`] for
/// that.
pub fn remove(links: &[Link], id: LinkId) -> Result<Vec<Link>, OrderingError> {
    let position = position_of(links, id)?;
    let mut remaining = links.to_vec();
    remaining.remove(position);
    Ok(remaining)
}

/// Restores the contiguous `0..N` ordering, keeping the relative order given
/// by the current indices. Ties keep their list order.
pub fn reindex(links: &[Link]) -> Vec<Link> {
    let mut sorted = links.to_vec();
    sorted.sort_by_key(|l| l.order_index);
    assign_positions(sorted)
}

/// Rows whose index differs between `before` and `after`, in `after` order.
pub fn order_updates(before: &[Link], after: &[Link]) -> Vec<OrderUpdate> {
    after
        .iter()
        .filter(|link| {
            before
                .iter()
                .find(|old| old.id == link.id)
                .map_or(true, |old| old.order_index != link.order_index)
        })
        .map(|link| OrderUpdate {
            id: link.id,
            order_index: link.order_index,
        })
        .collect()
}

// ───── Helpers ──────────────────────────────────────────────────────────── //

fn position_of(links: &[Link], id: LinkId) -> Result<usize, OrderingError> {
    links
        .iter()
        .position(|l| l.id == id)
        .ok_or(OrderingError::UnknownId(id))
}

fn assign_positions(mut links: Vec<Link>) -> Vec<Link> {
    for (index, link) in links.iter_mut().enumerate() {
        link.order_index = u32::try_from(index).unwrap_or(u32::MAX);
    }
    links
}

// ───── Unit tests ───────────────────────────────────────────────────────── //
