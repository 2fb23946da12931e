use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub url: String,
    pub summary: String,
    pub summarized_at: DateTime<Utc>,
}
