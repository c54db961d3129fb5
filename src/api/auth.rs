// src/api/auth.rs — Optional bearer-token gate for the sync endpoint

use crate::api::{types::ErrorResponse, ApiState};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;

/// Token presented in `Authorization: Bearer <token>`, if any.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Pass when no token is configured or the presented one matches.
pub fn check_auth(
    state: &ApiState,
    headers: &HeaderMap,
) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    let Some(expected) = state.token.as_deref() else {
        return Ok(());
    };

    match bearer_token(headers) {
        Some(presented) if tokens_match(presented, expected) => Ok(()),
        _ => {
            tracing::debug!("Rejected sync request with missing or wrong token");
            Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Invalid or missing bearer token".into(),
                }),
            ))
        }
    }
}

/// Length check first, then a comparison that does not short-circuit.
fn tokens_match(presented: &str, expected: &str) -> bool {
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
