//! Tolerant readers for free-form model output.
//!
//! Nothing here returns an error: a reply that cannot be read is `None`, a
//! number that cannot be read is the caller's default.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

/// Extracts the first balanced top-level JSON object from `text`.
///
/// Markdown code fences (` ``` ` or ` ```json `, any case) are stripped from
/// both ends first. Prose before or after the object is ignored. Braces inside
/// string literals do not count towards nesting. Returns `None` when there is
/// no `{`, the braces never balance, or the span is not valid JSON.
pub fn extract_json(text: &str) -> Option<Map<String, Value>> {
    let text = strip_code_fences(text);
    let start = text.find('{')?;
    let end = balanced_object_end(&text[start..])? + start;

    match serde_json::from_str::<Value>(&text[start..end]) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn strip_code_fences(text: &str) -> &str {
    static RE_OPEN: OnceLock<Regex> = OnceLock::new();
    static RE_CLOSE: OnceLock<Regex> = OnceLock::new();
    let re_open = RE_OPEN.get_or_init(|| Regex::new(r"(?i)^\s*```(?:json)?").expect("valid regex"));
    let re_close = RE_CLOSE.get_or_init(|| Regex::new(r"```\s*$").expect("valid regex"));

    let text = match re_open.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    };
    let text = match re_close.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    };
    text.trim()
}

/// Byte offset just past the `}` that closes the object opening at offset 0.
fn balanced_object_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Reads a score, clamped into `[0, 100]`.
///
/// Numbers and numeric strings are accepted; infinities clamp like any other
/// out-of-range value. Anything else (missing, null, non-numeric text, NaN)
/// yields `default` unchanged.
pub fn safe_number(value: Option<&Value>, default: f64) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    match parsed {
        Some(n) if !n.is_nan() => n.clamp(0.0, 100.0),
        _ => default,
    }
}

/// Reads a list of feedback strings. Non-string items are stringified;
/// anything that is not an array becomes an empty list.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_json_from_json_fence() {
        let map = extract_json("```json\n{\"a\":1}\n```").unwrap();
        assert_eq!(Value::Object(map), json!({"a": 1}));
    }

    #[test]
    fn test_extract_json_from_plain_and_uppercase_fences() {
        assert!(extract_json("```\n{\"a\":1}\n```").is_some());
        assert!(extract_json("```JSON\n{\"a\":1}\n```").is_some());
    }

    #[test]
    fn test_extract_json_ignores_surrounding_prose() {
        let text = "Sure! Here is my review:\n{\"score\": 80, \"nested\": {\"x\": [1, 2]}}\nHope this helps {really}.";
        let map = extract_json(text).unwrap();
        assert_eq!(map["score"], json!(80));
        assert_eq!(map["nested"], json!({"x": [1, 2]}));
    }

    #[test]
    fn test_extract_json_takes_first_object() {
        let map = extract_json("{\"first\": true} {\"second\": true}").unwrap();
        assert!(map.contains_key("first"));
        assert!(!map.contains_key("second"));
    }

    #[test]
    fn test_extract_json_braces_inside_strings() {
        let map = extract_json(r#"{"suggestions": ["Use {placeholders} sparingly", "close }"]}"#).unwrap();
        assert_eq!(map["suggestions"][1], json!("close }"));
    }

    #[test]
    fn test_extract_json_garbage_is_none() {
        assert!(extract_json("garbage text with { not json").is_none());
        assert!(extract_json("no braces at all").is_none());
        assert!(extract_json("").is_none());
        assert!(extract_json("{ unquoted: keys }").is_none());
    }

    #[test]
    fn test_extract_json_is_stable_on_its_own_output() {
        let first = extract_json("Result:\n```json\n{\"name\": \"Skills\", \"score\": \"75\"}\n```").unwrap();
        let serialized = serde_json::to_string(&first).unwrap();
        let second = extract_json(&serialized).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_safe_number_clamps() {
        assert_eq!(safe_number(Some(&json!(-5)), 0.0), 0.0);
        assert_eq!(safe_number(Some(&json!(150.5)), 0.0), 100.0);
        assert_eq!(safe_number(Some(&json!(42.5)), 0.0), 42.5);
        assert_eq!(safe_number(Some(&json!(100)), 0.0), 100.0);
        assert_eq!(safe_number(Some(&json!(0)), 7.0), 0.0);
    }

    #[test]
    fn test_safe_number_numeric_strings() {
        assert_eq!(safe_number(Some(&json!(" 88 ")), 0.0), 88.0);
        assert_eq!(safe_number(Some(&json!("-1")), 0.0), 0.0);
    }

    #[test]
    fn test_safe_number_non_numeric_returns_default() {
        assert_eq!(safe_number(Some(&json!("great")), 12.0), 12.0);
        assert_eq!(safe_number(Some(&json!(null)), 3.0), 3.0);
        assert_eq!(safe_number(Some(&json!([80])), 0.0), 0.0);
        assert_eq!(safe_number(Some(&json!("NaN")), 5.0), 5.0);
        assert_eq!(safe_number(None, 9.0), 9.0);
    }

    #[test]
    fn test_safe_number_infinities_clamp() {
        assert_eq!(safe_number(Some(&json!("inf")), 7.0), 100.0);
        assert_eq!(safe_number(Some(&json!("Infinity")), 7.0), 100.0);
        assert_eq!(safe_number(Some(&json!("-inf")), 7.0), 0.0);
        assert_eq!(safe_number(Some(&json!("nan")), 7.0), 7.0);
    }

    #[test]
    fn test_safe_number_always_in_range() {
        for v in [-1e9, -0.1, 0.0, 0.5, 50.0, 99.9, 100.0, 100.1, 1e12] {
            let n = safe_number(Some(&json!(v)), 0.0);
            assert!((0.0..=100.0).contains(&n), "{v} -> {n}");
        }
    }

    #[test]
    fn test_string_list() {
        assert_eq!(
            string_list(Some(&json!(["a", 1, true]))),
            vec!["a".to_string(), "1".to_string(), "true".to_string()]
        );
        assert!(string_list(Some(&json!("not a list"))).is_empty());
        assert!(string_list(None).is_empty());
    }
}
