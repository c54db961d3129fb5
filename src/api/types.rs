// src/api/types.rs

use serde::{Deserialize, Serialize};

use crate::usage::UsageEvent;

/// Body of `GET /api/usage-patterns`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UsagePatternsResponse {
    pub logs: Vec<UsageEvent>,
}

/// Body of `POST /api/usage-events` on success.
#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
    pub status: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
