//! Parsing of JSON-mode model responses.

use serde_json::Value;

/// Parses a model response that is supposed to be a single JSON document.
///
/// Leading/trailing whitespace and a surrounding Markdown code fence
/// (```` ```json ... ``` ````) are tolerated. Returns `None` for anything
/// that still fails to parse.
pub fn parse_json_response(raw: &str) -> Option<Value> {
    let body = strip_code_fence(raw.trim());
    if body.is_empty() {
        return None;
    }
    serde_json::from_str(body).ok()
}

/// Reads a string field from a parsed JSON object.
pub fn string_field<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value.get(field).and_then(Value::as_str)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the info string (e.g. "json") on the opening fence line.
    match rest.split_once('\n') {
        Some((_, body)) => body.trim(),
        None => rest.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_json() {
        assert_eq!(parse_json_response(r#"{"a":1}"#), Some(json!({"a": 1})));
    }

    #[test]
    fn test_fenced_json() {
        let raw = "```json\n{\"transcript\": \"hi\"}\n```";
        let value = parse_json_response(raw).unwrap();
        assert_eq!(string_field(&value, "transcript"), Some("hi"));
    }

    #[test]
    fn test_refusal_text_is_rejected() {
        assert_eq!(parse_json_response("sorry, I can't help"), None);
        assert_eq!(parse_json_response(""), None);
        assert_eq!(parse_json_response("   "), None);
    }

    #[test]
    fn test_string_field_wrong_type() {
        let value = json!({"transcript": 12});
        assert_eq!(string_field(&value, "transcript"), None);
        assert_eq!(string_field(&value, "missing"), None);
    }
}
