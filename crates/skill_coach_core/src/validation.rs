//! Field-level checks shared by both request decoders.

use serde_json::Value;

use crate::error::ValidationError;

/// Reads a required, non-blank string field. Surrounding whitespace is trimmed.
pub fn required_string(value: Option<&Value>, field: &str) -> Result<String, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::new(format!("{field} is required"))),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Err(ValidationError::new(format!("{field} is required")))
            } else {
                Ok(trimmed.to_string())
            }
        }
        Some(_) => Err(ValidationError::new(format!("{field} must be a string"))),
    }
}

/// Reads a list of strings, preserving order. `None` means the field was absent.
pub fn string_list(
    value: Option<&Value>,
    field: &str,
) -> Result<Option<Vec<String>>, ValidationError> {
    let items = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ValidationError::new(format!("{field} must be a list"))),
    };

    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                ValidationError::new(format!("{field} must contain only strings"))
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Reads a non-negative integer count. Whole-valued floats such as `150.0`
/// are accepted; fractional or negative values are not.
pub fn solved_count(value: Option<&Value>, field: &str) -> Result<Option<u64>, ValidationError> {
    let number = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(number)) => number,
        Some(_) => {
            return Err(ValidationError::new(format!(
                "{field} must be a non-negative integer"
            )))
        }
    };

    if let Some(count) = number.as_u64() {
        return Ok(Some(count));
    }

    match number.as_f64() {
        Some(float)
            if float.is_finite()
                && float >= 0.0
                && float.fract() == 0.0
                && float < u64::MAX as f64 =>
        {
            Ok(Some(float as u64))
        }
        _ => Err(ValidationError::new(format!(
            "{field} must be a non-negative integer"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn required_string_trims_and_rejects_blank() {
        assert_eq!(
            required_string(Some(&json!("  user-7 ")), "user_id").expect("should pass"),
            "user-7"
        );
        let error = required_string(Some(&json!("   ")), "user_id").expect_err("blank should fail");
        assert_eq!(error.message(), "user_id is required");
        let error = required_string(Some(&json!(42)), "user_id").expect_err("number should fail");
        assert_eq!(error.message(), "user_id must be a string");
    }

    #[test]
    fn string_list_rejects_mixed_items() {
        let error = string_list(Some(&json!(["Graphs", 3])), "weak_topics")
            .expect_err("mixed list should fail");
        assert_eq!(error.message(), "weak_topics must contain only strings");
    }

    #[test]
    fn string_list_distinguishes_absent_from_empty() {
        assert_eq!(string_list(None, "strong_topics").expect("absent"), None);
        assert_eq!(
            string_list(Some(&json!([])), "strong_topics").expect("empty"),
            Some(Vec::new())
        );
    }

    #[test]
    fn solved_count_accepts_whole_floats_only() {
        assert_eq!(solved_count(Some(&json!(150)), "total_solved").unwrap(), Some(150));
        assert_eq!(solved_count(Some(&json!(150.0)), "total_solved").unwrap(), Some(150));
        assert!(solved_count(Some(&json!(12.5)), "total_solved").is_err());
        assert!(solved_count(Some(&json!(-1)), "total_solved").is_err());
        assert!(solved_count(Some(&json!("10")), "total_solved").is_err());
    }

    #[test]
    fn solved_count_rejects_floats_beyond_u64() {
        let two_pow_64 = 18_446_744_073_709_551_616.0_f64;
        let error = solved_count(Some(&json!(two_pow_64)), "total_solved")
            .expect_err("2^64 does not fit in u64");
        assert_eq!(error.message(), "total_solved must be a non-negative integer");
        assert!(solved_count(Some(&json!(1e300)), "total_solved").is_err());
        assert_eq!(
            solved_count(Some(&json!(u64::MAX)), "total_solved").unwrap(),
            Some(u64::MAX)
        );
    }
}
