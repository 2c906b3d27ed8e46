use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::validation::{required_string, solved_count, string_list};

pub const STORE_PROFILE_OPERATION: &str = "store_profile";
pub const GET_PROFILE_OPERATION: &str = "get_profile";

/// Persisted skill profile, keyed by `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSkillProfile {
    pub user_id: String,
    pub weak_topics: Vec<String>,
    #[serde(default)]
    pub strong_topics: Vec<String>,
    pub total_solved: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileData {
    pub weak_topics: Vec<String>,
    pub strong_topics: Vec<String>,
    pub total_solved: u64,
}

/// Raw event shape before validation. Every field is optional so that
/// missing and mistyped values surface as field-specific messages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileEvent {
    #[serde(default)]
    pub operation: Option<Value>,
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub profile_data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileRequest {
    StoreProfile { user_id: String, data: ProfileData },
    GetProfile { user_id: String },
}

impl ProfileRequest {
    pub fn user_id(&self) -> &str {
        match self {
            Self::StoreProfile { user_id, .. } | Self::GetProfile { user_id } => user_id,
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            Self::StoreProfile { .. } => STORE_PROFILE_OPERATION,
            Self::GetProfile { .. } => GET_PROFILE_OPERATION,
        }
    }
}

/// Full-overwrite write for one profile. `written_at` becomes `updated_at`,
/// and `created_at` too when no record exists yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpsert {
    pub user_id: String,
    pub data: ProfileData,
    pub written_at: DateTime<Utc>,
}

impl ProfileUpsert {
    /// The record that results from applying this write on top of `existing`.
    pub fn apply(&self, existing: Option<&UserSkillProfile>) -> UserSkillProfile {
        UserSkillProfile {
            user_id: self.user_id.clone(),
            weak_topics: self.data.weak_topics.clone(),
            strong_topics: self.data.strong_topics.clone(),
            total_solved: self.data.total_solved,
            created_at: existing
                .map(|profile| profile.created_at)
                .unwrap_or(self.written_at),
            updated_at: self.written_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponseBody<'a> {
    pub message: &'a str,
    pub user_id: &'a str,
    pub profile: &'a UserSkillProfile,
}

pub fn decode_profile_event(event: Value) -> Result<ProfileRequest, ValidationError> {
    let event: ProfileEvent = serde_json::from_value(event)
        .map_err(|error| ValidationError::new(format!("Malformed request: {error}")))?;
    decode_profile_request(event)
}

pub fn decode_profile_request(event: ProfileEvent) -> Result<ProfileRequest, ValidationError> {
    let operation = match event.operation {
        None | Some(Value::Null) => return Err(ValidationError::new("operation is required")),
        Some(Value::String(operation)) => operation,
        Some(other) => return Err(ValidationError::new(format!("Invalid operation: {other}"))),
    };

    match operation.as_str() {
        STORE_PROFILE_OPERATION => {
            let user_id = required_string(event.user_id.as_ref(), "user_id")?;
            let data = decode_profile_data(event.profile_data.as_ref())?;
            Ok(ProfileRequest::StoreProfile { user_id, data })
        }
        GET_PROFILE_OPERATION => {
            let user_id = required_string(event.user_id.as_ref(), "user_id")?;
            Ok(ProfileRequest::GetProfile { user_id })
        }
        other => Err(ValidationError::new(format!("Invalid operation: {other}"))),
    }
}

fn decode_profile_data(value: Option<&Value>) -> Result<ProfileData, ValidationError> {
    let object = match value {
        None | Some(Value::Null) => return Err(ValidationError::new("profile_data is required")),
        Some(Value::Object(object)) => object,
        Some(_) => return Err(ValidationError::new("profile_data must be an object")),
    };

    let weak_topics = string_list(object.get("weak_topics"), "weak_topics")?
        .ok_or_else(|| ValidationError::new("weak_topics must be a list"))?;
    let strong_topics =
        string_list(object.get("strong_topics"), "strong_topics")?.unwrap_or_default();
    let total_solved = solved_count(object.get("total_solved"), "total_solved")?.unwrap_or(0);

    Ok(ProfileData {
        weak_topics,
        strong_topics,
        total_solved,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 14, hour, 0, 0).unwrap()
    }

    #[test]
    fn decodes_store_request_with_defaults() {
        let request = decode_profile_event(json!({
            "operation": "store_profile",
            "user_id": "user-1",
            "profile_data": {"weak_topics": ["Graphs", "Dynamic Programming"]}
        }))
        .expect("request should decode");

        assert_eq!(
            request,
            ProfileRequest::StoreProfile {
                user_id: "user-1".to_string(),
                data: ProfileData {
                    weak_topics: vec!["Graphs".to_string(), "Dynamic Programming".to_string()],
                    strong_topics: Vec::new(),
                    total_solved: 0,
                },
            }
        );
    }

    #[test]
    fn get_request_ignores_profile_data() {
        let request = decode_profile_event(json!({
            "operation": "get_profile",
            "user_id": "user-1",
            "profile_data": "ignored"
        }))
        .expect("request should decode");
        assert_eq!(request.operation(), GET_PROFILE_OPERATION);
        assert_eq!(request.user_id(), "user-1");
    }

    #[test]
    fn rejects_unknown_operation() {
        let error = decode_profile_event(json!({"operation": "delete_profile", "user_id": "u"}))
            .expect_err("unknown operation should fail");
        assert_eq!(error.message(), "Invalid operation: delete_profile");
    }

    #[test]
    fn rejects_missing_operation_and_user_id() {
        let error = decode_profile_event(json!({"user_id": "u"})).expect_err("should fail");
        assert_eq!(error.message(), "operation is required");

        let error =
            decode_profile_event(json!({"operation": "get_profile"})).expect_err("should fail");
        assert_eq!(error.message(), "user_id is required");
    }

    #[test]
    fn rejects_malformed_profile_data() {
        let error = decode_profile_event(json!({
            "operation": "store_profile",
            "user_id": "u"
        }))
        .expect_err("missing profile_data should fail");
        assert_eq!(error.message(), "profile_data is required");

        let error = decode_profile_event(json!({
            "operation": "store_profile",
            "user_id": "u",
            "profile_data": {"weak_topics": "Graphs"}
        }))
        .expect_err("scalar weak_topics should fail");
        assert_eq!(error.message(), "weak_topics must be a list");

        let error = decode_profile_event(json!({
            "operation": "store_profile",
            "user_id": "u",
            "profile_data": {"weak_topics": [], "total_solved": -4}
        }))
        .expect_err("negative count should fail");
        assert_eq!(error.message(), "total_solved must be a non-negative integer");
    }

    #[test]
    fn upsert_preserves_created_at_of_existing_record() {
        let first = ProfileUpsert {
            user_id: "u".to_string(),
            data: ProfileData {
                weak_topics: vec!["Trees".to_string()],
                strong_topics: Vec::new(),
                total_solved: 10,
            },
            written_at: at(8),
        }
        .apply(None);
        assert_eq!(first.created_at, first.updated_at);

        let second = ProfileUpsert {
            user_id: "u".to_string(),
            data: ProfileData {
                weak_topics: vec!["Graphs".to_string()],
                strong_topics: vec!["Arrays".to_string()],
                total_solved: 60,
            },
            written_at: at(9),
        }
        .apply(Some(&first));

        assert_eq!(second.created_at, at(8));
        assert_eq!(second.updated_at, at(9));
        assert_eq!(second.weak_topics, vec!["Graphs".to_string()]);
        assert_eq!(second.total_solved, 60);
    }
}
