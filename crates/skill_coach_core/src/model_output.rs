//! Turns raw model text into the roadmap payload.
//!
//! Only the top-level shape is checked: the text must be a JSON object with a
//! `roadmap` array. Per-day entries pass through untouched.

use serde_json::Value;

use crate::error::HandlerError;

/// Returns the JSON candidate inside `raw`, unwrapping a markdown code fence
/// when the model added one.
pub fn extract_json_payload(raw: &str) -> &str {
    let trimmed = raw.trim();

    let fenced = trimmed
        .find("```json")
        .map(|start| start + "```json".len())
        .or_else(|| trimmed.find("```").map(|start| start + "```".len()));

    let Some(content_start) = fenced else {
        return trimmed;
    };

    let rest = &trimmed[content_start..];
    match rest.find("```") {
        Some(end) => rest[..end].trim(),
        None => rest.trim(),
    }
}

pub fn parse_roadmap_output(raw: &str) -> Result<Value, HandlerError> {
    let candidate = extract_json_payload(raw);

    let parsed: Value = serde_json::from_str(candidate)
        .map_err(|error| malformed(format!("model output is not valid JSON: {error}"), raw))?;

    match parsed.get("roadmap") {
        Some(Value::Array(_)) => Ok(parsed),
        Some(_) => Err(malformed("'roadmap' field is not an array", raw)),
        None => Err(malformed("response missing 'roadmap' field", raw)),
    }
}

fn malformed(reason: impl Into<String>, raw: &str) -> HandlerError {
    HandlerError::MalformedModelOutput {
        reason: reason.into(),
        raw_output: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn plain_json_is_returned_as_is() {
        let raw = r#"  {"roadmap": [], "overall_strategy": "steady"}  "#;
        let parsed = parse_roadmap_output(raw).expect("should parse");
        assert_eq!(parsed["overall_strategy"], json!("steady"));
    }

    #[test]
    fn json_fence_is_unwrapped() {
        let raw = "Here you go:\n```json\n{\"roadmap\": [{\"day\": 1}]}\n```\nGood luck!";
        assert_eq!(extract_json_payload(raw), "{\"roadmap\": [{\"day\": 1}]}");
        let parsed = parse_roadmap_output(raw).expect("fenced output should parse");
        assert_eq!(parsed["roadmap"][0]["day"], json!(1));
    }

    #[test]
    fn bare_fence_is_unwrapped() {
        let raw = "```\n{\"roadmap\": []}\n```";
        assert_eq!(extract_json_payload(raw), "{\"roadmap\": []}");
    }

    #[test]
    fn non_json_text_is_malformed() {
        let error = parse_roadmap_output("I cannot help with that.").expect_err("should fail");
        match error {
            HandlerError::MalformedModelOutput { raw_output, .. } => {
                assert_eq!(raw_output, "I cannot help with that.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_roadmap_field_is_malformed() {
        let error = parse_roadmap_output(r#"{"plan": []}"#).expect_err("should fail");
        assert!(error.to_string().contains("missing 'roadmap'"));

        let error = parse_roadmap_output(r#"{"roadmap": "day one"}"#).expect_err("should fail");
        assert!(error.to_string().contains("not an array"));
    }

    #[test]
    fn per_day_fields_are_not_validated() {
        let parsed = parse_roadmap_output(r#"{"roadmap": [{"unexpected": true}]}"#)
            .expect("lenient on entry shape");
        assert_eq!(parsed["roadmap"][0]["unexpected"], json!(true));
    }
}
