use chrono::{DateTime, Utc};

pub mod profile;
pub mod roadmap;

/// Per-invocation context captured at the Lambda boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub request_id: String,
    pub invoked_at: DateTime<Utc>,
}

impl Invocation {
    pub fn new(request_id: impl Into<String>, invoked_at: DateTime<Utc>) -> Self {
        Self {
            request_id: request_id.into(),
            invoked_at,
        }
    }
}
