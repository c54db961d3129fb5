// src/api/handlers.rs

use crate::api::{auth, types::*, ApiState};
use crate::usage::UsageEvent;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

/// GET /api/usage-patterns — Journal window for other sessions to merge.
pub async fn get_usage_patterns(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<UsagePatternsResponse>, (StatusCode, Json<ErrorResponse>)> {
    auth::check_auth(&state, &headers)?;

    let logs = state.journal.query(state.journal.limits().max_age_days);
    Ok(Json(UsagePatternsResponse { logs }))
}

/// POST /api/usage-events — Append one event to the shared journal.
pub async fn post_usage_event(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(event): Json<UsageEvent>,
) -> Result<(StatusCode, Json<AcceptedResponse>), (StatusCode, Json<ErrorResponse>)> {
    auth::check_auth(&state, &headers)?;

    if !event.is_valid() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Invalid usage event for '{}'", event.destination),
            }),
        ));
    }

    state.journal.append(event);
    Ok((
        StatusCode::ACCEPTED,
        Json(AcceptedResponse {
            status: "accepted".into(),
        }),
    ))
}

/// GET /api/health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
