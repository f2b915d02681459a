//! Response envelopes.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// List envelope: `{items, total}`.
#[derive(Serialize)]
pub struct ListEnvelope<T> {
    pub items: Vec<T>,
    pub total: i64,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}
