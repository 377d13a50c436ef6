//! Schema Coercer port.
//!
//! Turns an LLM-authored free-text argument string into a typed argument
//! bag, guided by a tool's declared [`ArgField`]s. This is a pure function
//! rather than a trait object — there is exactly one coercion algorithm
//! (the seven-step procedure below), so no adapter seam is needed; it lives
//! in `application` so node use cases can call it without depending on
//! `infrastructure`.

use mcphost_domain::{ArgField, ArgType};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum CoercionError {
    #[error("missing required argument '{0}'")]
    MissingRequired(String),

    #[error("argument '{field}' could not be coerced to {expected:?}: {raw}")]
    TypeMismatch {
        field: String,
        expected: ArgType,
        raw: String,
    },
}

/// Coerce `raw_args_text` against `schema`.
///
/// 1. Trim the raw text; empty + no required fields ⇒ empty bag.
/// 2. If the trimmed text parses as a JSON object, use its keys directly
///    (the "fast path" — an LLM that already emitted structured JSON).
/// 3. Otherwise split on top-level commas (respecting quoted substrings).
/// 4. Further split each segment on the first `=` or `:` for `key=value`
///    / `key: value` forms; bare segments are assigned positionally to the
///    schema's fields in declared order.
/// 5. For each schema field, coerce its matched raw token to `arg_type`.
/// 6. Fields absent from the input fall back to `default` if present.
/// 7. A still-missing `required` field is an error.
pub fn coerce_arguments(
    raw_args_text: &str,
    schema: &[ArgField],
) -> Result<HashMap<String, Value>, CoercionError> {
    let trimmed = raw_args_text.trim();

    let mut raw_by_name: HashMap<String, String> = HashMap::new();

    if trimmed.is_empty() {
        // fall through to defaults/required check below
    } else if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        for (key, value) in map {
            raw_by_name.insert(key, value_to_raw(&value));
        }
    } else {
        let segments = split_top_level_commas(trimmed);
        let mut positional_index = 0usize;

        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            if let Some((key, value)) = split_key_value(segment) {
                raw_by_name.insert(key.trim().to_string(), value.trim().to_string());
            } else if let Some(field) = schema.get(positional_index) {
                raw_by_name.insert(field.field_name.clone(), unquote(segment));
                positional_index += 1;
            }
        }
    }

    let mut result = HashMap::new();
    for field in schema {
        let value = match raw_by_name.get(&field.field_name) {
            Some(raw) => Some(coerce_one(&field.field_name, raw, field.arg_type)?),
            None => field.default.clone(),
        };

        match value {
            Some(v) => {
                result.insert(field.field_name.clone(), v);
            }
            None if field.required => {
                return Err(CoercionError::MissingRequired(field.field_name.clone()));
            }
            None => {}
        }
    }

    Ok(result)
}

fn value_to_raw(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn split_top_level_commas(input: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quote_char = '"';

    for ch in input.chars() {
        if in_quotes {
            current.push(ch);
            if ch == quote_char {
                in_quotes = false;
            }
        } else if ch == '"' || ch == '\'' {
            in_quotes = true;
            quote_char = ch;
            current.push(ch);
        } else if ch == ',' {
            segments.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn split_key_value(segment: &str) -> Option<(&str, &str)> {
    for delim in ['=', ':'] {
        if let Some(idx) = segment.find(delim) {
            return Some((&segment[..idx], &segment[idx + 1..]));
        }
    }
    None
}

fn unquote(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 {
        let bytes = trimmed.as_bytes();
        let first = bytes[0] as char;
        let last = bytes[bytes.len() - 1] as char;
        if (first == '"' && last == '"') || (first == '\'' && last == '\'') {
            return trimmed[1..trimmed.len() - 1].to_string();
        }
    }
    trimmed.to_string()
}

fn coerce_one(field_name: &str, raw: &str, arg_type: ArgType) -> Result<Value, CoercionError> {
    let raw = unquote(raw);
    match arg_type {
        ArgType::String => Ok(Value::String(raw)),
        ArgType::Integer => raw
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| CoercionError::TypeMismatch {
                field: field_name.to_string(),
                expected: arg_type,
                raw,
            }),
        ArgType::Number => raw
            .parse::<f64>()
            .map(Value::from)
            .map_err(|_| CoercionError::TypeMismatch {
                field: field_name.to_string(),
                expected: arg_type,
                raw,
            }),
        ArgType::Boolean => match raw.to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "0" => Ok(Value::Bool(false)),
            _ => Err(CoercionError::TypeMismatch {
                field: field_name.to_string(),
                expected: arg_type,
                raw,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Vec<ArgField> {
        vec![
            ArgField::new("city", ArgType::String, true),
            ArgField::new("units", ArgType::String, false).with_default(Value::String("metric".into())),
        ]
    }

    #[test]
    fn json_fast_path() {
        let result = coerce_arguments(r#"{"city": "Paris", "units": "imperial"}"#, &schema()).unwrap();
        assert_eq!(result["city"], Value::String("Paris".into()));
        assert_eq!(result["units"], Value::String("imperial".into()));
    }

    #[test]
    fn comma_separated_positional() {
        let result = coerce_arguments("Paris, imperial", &schema()).unwrap();
        assert_eq!(result["city"], Value::String("Paris".into()));
        assert_eq!(result["units"], Value::String("imperial".into()));
    }

    #[test]
    fn key_value_form() {
        let result = coerce_arguments("city=Paris, units=imperial", &schema()).unwrap();
        assert_eq!(result["city"], Value::String("Paris".into()));
    }

    #[test]
    fn missing_required_is_error() {
        let err = coerce_arguments("", &schema()).unwrap_err();
        assert!(matches!(err, CoercionError::MissingRequired(_)));
    }

    #[test]
    fn default_fills_optional() {
        let result = coerce_arguments("Paris", &schema()).unwrap();
        assert_eq!(result["units"], Value::String("metric".into()));
    }

    #[test]
    fn integer_coercion() {
        let schema = vec![ArgField::new("count", ArgType::Integer, true)];
        let result = coerce_arguments("count=5", &schema).unwrap();
        assert_eq!(result["count"], Value::from(5));
    }
}
