use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{HandlerError, ValidationError};

/// Lambda proxy response. `body` is the JSON document serialized to a
/// string, which API Gateway requires.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

impl HandlerResponse {
    /// Parses `body` back into JSON. A body that is not JSON yields `Null`.
    pub fn body_json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }

    pub fn error_message(&self) -> Option<String> {
        self.body_json()
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Accepts either a direct-invocation event or an API Gateway proxy event
/// and returns the request object it carries.
pub fn normalize_event(event: Value) -> Result<Value, ValidationError> {
    let Some(object) = event.as_object() else {
        return Err(ValidationError::new("Request payload must be a JSON object"));
    };

    let Some(body) = object.get("body") else {
        return Ok(event);
    };

    match body {
        Value::Null => Ok(json!({})),
        Value::Object(_) => Ok(body.clone()),
        Value::String(text) => {
            let decoded: Value = serde_json::from_str(text)
                .map_err(|error| ValidationError::new(format!("Malformed JSON body: {error}")))?;
            if decoded.is_object() {
                Ok(decoded)
            } else {
                Err(ValidationError::new("Request body must be a JSON object"))
            }
        }
        _ => Err(ValidationError::new("Request body must be a JSON object")),
    }
}

pub fn success_response(payload: impl Serialize) -> Result<HandlerResponse, HandlerError> {
    let body = serde_json::to_string(&payload)
        .map_err(|error| HandlerError::ResponseEncoding(error.to_string()))?;
    Ok(HandlerResponse {
        status_code: 200,
        headers: json_headers(),
        body,
    })
}

pub fn error_response(error: &HandlerError, at: DateTime<Utc>) -> HandlerResponse {
    HandlerResponse {
        status_code: error.status_code(),
        headers: json_headers(),
        body: json!({
            "error": error.public_message(),
            "timestamp": at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        })
        .to_string(),
    }
}

fn json_headers() -> Value {
    json!({"Content-Type": "application/json"})
}
