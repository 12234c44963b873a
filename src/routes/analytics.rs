use axum::extract::{Path, Query};
use axum::Json;
use serde::Deserialize;
use time::OffsetDateTime;

// ───── Current Crate Imports ────────────────────────────────────────────── //

use crate::connection_pool::DatabaseConnection;
use crate::domain::{summarize, AnalyticsSummary, TimeRange};
use crate::queries;

use super::{profile_or_404, ApiError};

// ───── Body ─────────────────────────────────────────────────────────────── //

#[derive(Deserialize, Debug)]
pub struct Parameters {
    #[serde(default)]
    range: TimeRange,
}

#[tracing::instrument(name = "Get analytics", skip(client))]
pub async fn get_analytics(
    DatabaseConnection(client): DatabaseConnection,
    Path(username): Path<String>,
    Query(parameters): Query<Parameters>,
) -> Result<Json<AnalyticsSummary>, ApiError> {
    let profile = profile_or_404(&client, &username).await?;
    let now = OffsetDateTime::now_utc();
    let events = queries::analytics::load_events(
        &client,
        profile.id,
        parameters.range.cutoff(now),
    )
    .await?;
    Ok(Json(summarize(&events, parameters.range, now)))
}
