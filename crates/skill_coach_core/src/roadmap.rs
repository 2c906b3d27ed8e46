use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::ValidationError;
use crate::validation::{solved_count, string_list};

pub const INTERMEDIATE_MIN_SOLVED: u64 = 50;
pub const ADVANCED_MIN_SOLVED: u64 = 200;
pub const ROADMAP_DAYS: usize = 7;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub fn from_total_solved(total_solved: u64) -> Self {
        if total_solved < INTERMEDIATE_MIN_SOLVED {
            Self::Beginner
        } else if total_solved < ADVANCED_MIN_SOLVED {
            Self::Intermediate
        } else {
            Self::Advanced
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoadmapEvent {
    #[serde(default)]
    pub weak_topics: Option<Value>,
    #[serde(default)]
    pub total_solved: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoadmapRequest {
    pub weak_topics: Vec<String>,
    pub total_solved: u64,
}

impl RoadmapRequest {
    pub fn level(&self) -> SkillLevel {
        SkillLevel::from_total_solved(self.total_solved)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoadmapResponseBody<'a> {
    pub message: &'a str,
    pub user_level: SkillLevel,
    pub total_solved: u64,
    pub weak_topics: &'a [String],
    pub roadmap: &'a Value,
    pub generated_at: DateTime<Utc>,
}

pub fn decode_roadmap_event(event: Value) -> Result<RoadmapRequest, ValidationError> {
    let event: RoadmapEvent = serde_json::from_value(event)
        .map_err(|error| ValidationError::new(format!("Malformed request: {error}")))?;
    decode_roadmap_request(event)
}

pub fn decode_roadmap_request(event: RoadmapEvent) -> Result<RoadmapRequest, ValidationError> {
    let weak_topics = string_list(event.weak_topics.as_ref(), "weak_topics")?
        .filter(|topics| !topics.is_empty())
        .ok_or_else(|| ValidationError::new("weak_topics is required and cannot be empty"))?;

    let total_solved = solved_count(event.total_solved.as_ref(), "total_solved")?
        .ok_or_else(|| ValidationError::new("total_solved is required"))?;

    Ok(RoadmapRequest {
        weak_topics,
        total_solved,
    })
}

/// Stable SHA-256 of the request contract, used to correlate identical
/// inputs across log lines.
pub fn request_fingerprint(request: &RoadmapRequest) -> String {
    let mut hasher = Sha256::new();
    hasher.update(stable_contract_json(request));
    format!("{:x}", hasher.finalize())
}

fn stable_contract_json(request: &RoadmapRequest) -> String {
    serde_json::to_string(request).unwrap_or_else(|_| format!("{request:?}"))
}
