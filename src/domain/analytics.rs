//! Click and page view aggregation for the analytics dashboard.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};
use uuid::Uuid;

// ───── Body ─────────────────────────────────────────────────────────────── //

const TOP_REFERRERS: usize = 5;

/// One recorded visit. `link_id` is `None` for a page view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClickEvent {
    pub link_id: Option<Uuid>,
    /// Title of the clicked link, when it still exists.
    pub link_title: Option<String>,
    pub referrer: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub clicked_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "all")]
    All,
}

impl TimeRange {
    /// Earliest instant included in the range, `None` for everything.
    pub fn cutoff(&self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        let days = match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
            TimeRange::All => return None,
        };
        Some(now - Duration::days(days))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkClicks {
    pub link_id: Uuid,
    pub title: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyClicks {
    /// `YYYY-MM-DD`, UTC.
    pub date: String,
    pub clicks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferrerCount {
    pub referrer: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total_clicks: u64,
    pub clicks_per_link: Vec<LinkClicks>,
    pub clicks_per_day: Vec<DailyClicks>,
    pub avg_clicks_per_day: f64,
    pub top_referrers: Vec<ReferrerCount>,
}

pub fn summarize(
    events: &[ClickEvent],
    range: TimeRange,
    now: OffsetDateTime,
) -> AnalyticsSummary {
    let cutoff = range.cutoff(now);
    let in_range: Vec<&ClickEvent> = events
        .iter()
        .filter(|e| cutoff.map_or(true, |c| e.clicked_at >= c))
        .collect();

    let total_clicks = in_range.len() as u64;

    // Per link, first seen title wins.
    let mut per_link: Vec<LinkClicks> = Vec::new();
    for event in &in_range {
        let Some(link_id) = event.link_id else {
            continue;
        };
        match per_link.iter_mut().find(|l| l.link_id == link_id) {
            Some(entry) => entry.count += 1,
            None => per_link.push(LinkClicks {
                link_id,
                title: event
                    .link_title
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string()),
                count: 1,
            }),
        }
    }
    // Stable sort keeps first-seen order between equal counts.
    per_link.sort_by(|a, b| b.count.cmp(&a.count));

    let mut per_day: HashMap<Date, u64> = HashMap::new();
    for event in &in_range {
        let day = event.clicked_at.to_offset(time::UtcOffset::UTC).date();
        *per_day.entry(day).or_default() += 1;
    }
    let mut per_day: Vec<(Date, u64)> = per_day.into_iter().collect();
    per_day.sort_by_key(|(day, _)| *day);

    let avg_clicks_per_day = if per_day.is_empty() {
        0.0
    } else {
        total_clicks as f64 / per_day.len() as f64
    };

    let mut referrers: Vec<ReferrerCount> = Vec::new();
    for event in &in_range {
        let referrer = match event.referrer.as_deref() {
            Some(r) if !r.trim().is_empty() => r,
            _ => "Direct",
        };
        match referrers.iter_mut().find(|r| r.referrer == referrer) {
            Some(entry) => entry.count += 1,
            None => referrers.push(ReferrerCount {
                referrer: referrer.to_string(),
                count: 1,
            }),
        }
    }
    referrers.sort_by(|a, b| b.count.cmp(&a.count));
    referrers.truncate(TOP_REFERRERS);

    AnalyticsSummary {
        total_clicks,
        clicks_per_link: per_link,
        clicks_per_day: per_day
            .into_iter()
            .map(|(date, clicks)| DailyClicks {
                date: date.to_string(),
                clicks,
            })
            .collect(),
        avg_clicks_per_day,
        top_referrers: referrers,
    }
}

// ───── Unit tests ───────────────────────────────────────────────────────── //
