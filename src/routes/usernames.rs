use axum::extract::Query;
use axum::Json;
use serde::{Deserialize, Serialize};

// ───── Current Crate Imports ────────────────────────────────────────────── //

use crate::connection_pool::DatabaseConnection;
use crate::domain::{sanitize, validate, Username};
use crate::queries;

use super::ApiError;

// ───── Body ─────────────────────────────────────────────────────────────── //

#[derive(Deserialize, Debug)]
pub struct Parameters {
    username: String,
}

/// Live feedback for a username field: strict verdict, a suggested
/// correction and, for valid names, whether the name is still free.
#[derive(Serialize, Debug)]
pub struct UsernameCheck {
    is_valid: bool,
    error: Option<String>,
    error_kind: Option<&'static str>,
    normalized: Option<Username>,
    sanitized: String,
    available: Option<bool>,
}

#[tracing::instrument(
    name = "Check username",
    skip(client, parameters),
    fields(username = %parameters.username)
)]
pub async fn check_username(
    DatabaseConnection(client): DatabaseConnection,
    Query(parameters): Query<Parameters>,
) -> Result<Json<UsernameCheck>, ApiError> {
    let verdict = validate(&parameters.username);

    let available = match &verdict.normalized {
        Some(username) => {
            Some(!queries::profiles::username_taken(&client, username).await?)
        }
        None => None,
    };

    Ok(Json(UsernameCheck {
        is_valid: verdict.is_valid,
        error: verdict.error.map(|e| e.to_string()),
        error_kind: verdict.error.map(|e| e.kind()),
        normalized: verdict.normalized,
        sanitized: sanitize(&parameters.username),
        available,
    }))
}
