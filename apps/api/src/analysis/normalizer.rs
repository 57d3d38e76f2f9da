//! Response Normalizer — turns an untrusted completion string into JSON.
//!
//! Providers wrap JSON in markdown fences, emit trailing commas, or truncate
//! mid-object when they hit the token limit. The pipeline here:
//!
//! 1. strip markdown fences
//! 2. direct parse (happy path, returns the input's parse unchanged)
//! 3. textual repairs: trailing commas, duplicate commas, boundary punctuation
//! 4. depth-aware truncation to the last complete top-level value
//! 5. re-parse, or fail loudly
//!
//! Input that cannot be repaired is an `Unrecoverable` error carrying the
//! best-effort cleaned text for diagnostics — never a guessed partial result.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("completion could not be repaired into valid JSON: {source}")]
    Unrecoverable {
        /// Best-effort cleaned text, kept for logging. Never shown to users.
        cleaned: String,
        #[source]
        source: serde_json::Error,
    },
}

// Trailing comma before a closing brace/bracket: `, }` / `, ]`
static TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",(\s*[}\]])").unwrap());
// Accidental double commas: `,,` / `, ,`
static DUPLICATE_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*,").unwrap());
// Adjacent values missing their separator: `}{`, `]{`
static OBJECT_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\}\s*\{").unwrap());
static ARRAY_OBJECT_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\]\s*\{").unwrap());
static OBJECT_ARRAY_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\}\s*\]").unwrap());

/// Normalizes a raw completion into a parsed JSON value.
pub fn normalize(raw: &str) -> Result<Value, NormalizeError> {
    let text = strip_fences(raw);

    // Happy path: already valid JSON, return its parse as-is.
    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }

    warn!("completion is not valid JSON, applying repair heuristics");
    let repaired = repair(text);
    let truncated = truncate_to_balanced(&repaired);

    match serde_json::from_str(truncated) {
        Ok(value) => {
            warn!("completion recovered after repair ({} chars kept)", truncated.len());
            Ok(value)
        }
        Err(source) => Err(NormalizeError::Unrecoverable {
            cleaned: truncated.to_string(),
            source,
        }),
    }
}

/// Strips ```json ... ``` or ``` ... ``` fences and surrounding whitespace.
fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start();
    match rest.strip_suffix("```") {
        Some(inner) => inner.trim_end(),
        None => rest,
    }
}

/// Applies the textual repair passes in sequence.
///
/// These are heuristics over raw text: like the parse they are preparing
/// for, they can in principle touch comma runs inside string values, which
/// is accepted — the alternative is failing outright on truncated output.
fn repair(text: &str) -> String {
    let text = TRAILING_COMMA.replace_all(text, "$1");
    let text = DUPLICATE_COMMA.replace_all(&text, ",");
    // Re-run: collapsing `, ,` can expose a new trailing comma
    let text = TRAILING_COMMA.replace_all(&text, "$1");
    let text = OBJECT_BOUNDARY.replace_all(&text, "},{");
    let text = ARRAY_OBJECT_BOUNDARY.replace_all(&text, "],{");
    let text = OBJECT_ARRAY_CLOSE.replace_all(&text, "}]");
    text.into_owned()
}

/// Scans brace/bracket nesting depth, respecting string literals and escape
/// sequences, and truncates text that ends at nonzero depth back to the last
/// index where depth returned to zero. Recovers a complete top-level value
/// from a tail-truncated completion when one exists.
fn truncate_to_balanced(text: &str) -> &str {
    let mut depth: i64 = 0;
    let mut in_string = false;
    let mut escape = false;
    let mut last_balanced_end: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match c {
            '\\' => escape = true,
            '"' => in_string = !in_string,
            '{' | '[' if !in_string => depth += 1,
            '}' | ']' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    last_balanced_end = Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }

    match (depth, last_balanced_end) {
        (0, _) => text,
        (_, Some(end)) => &text[..end],
        (_, None) => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_json_passes_through_unchanged() {
        let input = r#"{"overview": {"impactScore": 70}, "threats": []}"#;
        let value = normalize(input).unwrap();
        assert_eq!(value, json!({"overview": {"impactScore": 70}, "threats": []}));
    }

    #[test]
    fn test_fenced_json_with_tag_matches_unwrapped_parse() {
        let inner = r#"{"key": "value"}"#;
        let fenced = format!("```json\n{inner}\n```");
        assert_eq!(normalize(&fenced).unwrap(), normalize(inner).unwrap());
    }

    #[test]
    fn test_fenced_json_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(normalize(input).unwrap(), json!({"key": "value"}));
    }

    #[test]
    fn test_unterminated_fence_still_recovers() {
        let input = "```json\n{\"key\": \"value\"}";
        assert_eq!(normalize(input).unwrap(), json!({"key": "value"}));
    }

    #[test]
    fn test_trailing_comma_before_brace_repaired() {
        let input = r#"{"a": 1, "b": 2, }"#;
        assert_eq!(normalize(input).unwrap(), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_trailing_comma_before_bracket_repaired() {
        let input = r#"{"items": [1, 2, 3, ]}"#;
        assert_eq!(normalize(input).unwrap(), json!({"items": [1, 2, 3]}));
    }

    #[test]
    fn test_duplicate_commas_collapsed() {
        let input = r#"{"items": [1,, 2, , 3]}"#;
        assert_eq!(normalize(input).unwrap(), json!({"items": [1, 2, 3]}));
    }

    #[test]
    fn test_duplicate_then_trailing_comma_repaired() {
        let input = r#"{"items": [1, 2, ,]}"#;
        assert_eq!(normalize(input).unwrap(), json!({"items": [1, 2]}));
    }

    #[test]
    fn test_missing_separator_between_array_objects() {
        let input = r#"{"items": [{"a": 1} {"b": 2}]}"#;
        assert_eq!(
            normalize(input).unwrap(),
            json!({"items": [{"a": 1}, {"b": 2}]})
        );
    }

    #[test]
    fn test_truncated_tail_recovers_last_complete_object() {
        // A complete top-level object followed by a truncated fragment
        let input = r#"{"overview": {"impactScore": 70, "summary": "ok"}}{"threats": [{"title":"#;
        assert_eq!(
            normalize(input).unwrap(),
            json!({"overview": {"impactScore": 70, "summary": "ok"}})
        );
    }

    #[test]
    fn test_truncated_mid_array_with_no_complete_object_fails() {
        // Depth never returns to zero — nothing recoverable
        let input = r#"{"overview": {"impactScore": 70, "summary": "truncated here"#;
        let err = normalize(input).unwrap_err();
        let NormalizeError::Unrecoverable { cleaned, .. } = err;
        assert!(cleaned.contains("impactScore"));
    }

    #[test]
    fn test_braces_inside_strings_do_not_confuse_depth_scan() {
        let input = r#"{"summary": "uses {braces} and ] inside", "score": 1}"#;
        assert_eq!(
            normalize(input).unwrap(),
            json!({"summary": "uses {braces} and ] inside", "score": 1})
        );
    }

    #[test]
    fn test_escaped_quote_inside_string_handled() {
        let input = r#"{"summary": "he said \"hi {\" then left", "score": 2}"#;
        let value = normalize(input).unwrap();
        assert_eq!(value["score"], 2);
    }

    #[test]
    fn test_prose_input_is_unrecoverable() {
        let input = "I'm sorry, I cannot produce that analysis right now.";
        assert!(normalize(input).is_err());
    }

    #[test]
    fn test_empty_input_is_unrecoverable() {
        assert!(normalize("").is_err());
        assert!(normalize("   \n ").is_err());
    }

    #[test]
    fn test_error_carries_cleaned_text_for_diagnostics() {
        let input = "```json\nnot json at all\n```";
        let NormalizeError::Unrecoverable { cleaned, .. } = normalize(input).unwrap_err();
        assert_eq!(cleaned, "not json at all");
    }

    #[test]
    fn test_strip_fences_no_fences() {
        assert_eq!(strip_fences("{\"key\": 1}"), "{\"key\": 1}");
    }

    #[test]
    fn test_truncate_keeps_balanced_text_intact() {
        let input = r#"{"a": [1, 2], "b": {"c": 3}}"#;
        assert_eq!(truncate_to_balanced(input), input);
    }
}
