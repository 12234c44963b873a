use http::StatusCode;

// ───── Body ─────────────────────────────────────────────────────────────── //

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
