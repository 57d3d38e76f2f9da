//! JobQuery — validated user input for an analysis request.
//!
//! Construction goes through `JobQuery::from_parts` so that every query the
//! pipeline sees has already passed field validation. The struct is never
//! mutated after construction.

use std::fmt;

use serde::Serialize;

const MIN_FIELD_CHARS: usize = 2;
const MAX_FIELD_CHARS: usize = 100;
const MAX_FREE_TEXT_CHARS: usize = 2000;

/// A single input validation failure, reported with the offending field.
#[derive(Debug, Clone, Serialize)]
pub struct QueryViolation {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for QueryViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validated, immutable analysis input.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    pub job_title: String,
    pub industry: String,
    pub responsibilities: Option<String>,
    pub skills: Option<String>,
}

impl JobQuery {
    /// Validates raw request fields into a `JobQuery`, accumulating every
    /// violation so the caller gets one complete diagnostic.
    pub fn from_parts(
        job_title: Option<String>,
        industry: Option<String>,
        responsibilities: Option<String>,
        skills: Option<String>,
    ) -> Result<Self, Vec<QueryViolation>> {
        let mut violations = Vec::new();

        let job_title = validate_required_field("jobTitle", job_title, &mut violations);
        let industry = validate_required_field("industry", industry, &mut violations);
        let responsibilities =
            validate_free_text("responsibilities", responsibilities, &mut violations);
        let skills = validate_free_text("skills", skills, &mut violations);

        if !violations.is_empty() {
            return Err(violations);
        }

        Ok(JobQuery {
            // A None required field always comes with a violation, so this
            // branch only ever sees Some
            job_title: job_title.unwrap_or_default(),
            industry: industry.unwrap_or_default(),
            responsibilities,
            skills,
        })
    }
}

fn validate_required_field(
    field: &'static str,
    value: Option<String>,
    violations: &mut Vec<QueryViolation>,
) -> Option<String> {
    let trimmed = value.as_deref().map(str::trim).unwrap_or("");

    if trimmed.is_empty() {
        violations.push(QueryViolation {
            field,
            message: "is required".to_string(),
        });
        return None;
    }

    let char_count = trimmed.chars().count();
    if char_count < MIN_FIELD_CHARS || char_count > MAX_FIELD_CHARS {
        violations.push(QueryViolation {
            field,
            message: format!(
                "must be between {MIN_FIELD_CHARS} and {MAX_FIELD_CHARS} characters"
            ),
        });
        return None;
    }

    if let Some(bad) = trimmed.chars().find(|c| !is_allowed_char(*c)) {
        violations.push(QueryViolation {
            field,
            message: format!("contains unsupported character {bad:?}"),
        });
        return None;
    }

    Some(trimmed.to_string())
}

/// Optional free-text fields: blank collapses to None, oversized is rejected.
fn validate_free_text(
    field: &'static str,
    value: Option<String>,
    violations: &mut Vec<QueryViolation>,
) -> Option<String> {
    let trimmed = value.as_deref().map(str::trim).unwrap_or("");
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.chars().count() > MAX_FREE_TEXT_CHARS {
        violations.push(QueryViolation {
            field,
            message: format!("must be at most {MAX_FREE_TEXT_CHARS} characters"),
        });
        return None;
    }

    Some(trimmed.to_string())
}

fn is_allowed_char(c: char) -> bool {
    c.is_alphanumeric()
        || c.is_whitespace()
        || matches!(c, '-' | '&' | ',' | '.' | '/' | '(' | ')' | '\'' | '+')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_and_industry(title: &str, industry: &str) -> Result<JobQuery, Vec<QueryViolation>> {
        JobQuery::from_parts(Some(title.to_string()), Some(industry.to_string()), None, None)
    }

    #[test]
    fn test_valid_query_passes() {
        let query = title_and_industry("Software Engineer", "Technology").unwrap();
        assert_eq!(query.job_title, "Software Engineer");
        assert_eq!(query.industry, "Technology");
        assert!(query.responsibilities.is_none());
        assert!(query.skills.is_none());
    }

    #[test]
    fn test_missing_job_title_is_violation() {
        let err = JobQuery::from_parts(None, Some("Technology".to_string()), None, None)
            .unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].field, "jobTitle");
        assert!(err[0].message.contains("required"));
    }

    #[test]
    fn test_blank_job_title_is_violation() {
        let err = title_and_industry("   ", "Technology").unwrap_err();
        assert_eq!(err[0].field, "jobTitle");
    }

    #[test]
    fn test_missing_both_required_fields_reports_both() {
        let err = JobQuery::from_parts(None, None, None, None).unwrap_err();
        let fields: Vec<_> = err.iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["jobTitle", "industry"]);
    }

    #[test]
    fn test_single_char_title_too_short() {
        let err = title_and_industry("X", "Technology").unwrap_err();
        assert!(err[0].message.contains("between 2 and 100"));
    }

    #[test]
    fn test_title_over_100_chars_too_long() {
        let long = "a".repeat(101);
        let err = title_and_industry(&long, "Technology").unwrap_err();
        assert!(err[0].message.contains("between 2 and 100"));
    }

    #[test]
    fn test_punctuation_allowed_in_title() {
        let query = title_and_industry("R&D Manager (Senior), M.Sc.", "Oil & Gas / Energy");
        assert!(query.is_ok());
    }

    #[test]
    fn test_control_chars_rejected() {
        let err = title_and_industry("Engineer<script>", "Technology").unwrap_err();
        assert!(err[0].message.contains("unsupported character"));
    }

    #[test]
    fn test_blank_free_text_collapses_to_none() {
        let query = JobQuery::from_parts(
            Some("Software Engineer".to_string()),
            Some("Technology".to_string()),
            Some("   ".to_string()),
            Some(String::new()),
        )
        .unwrap();
        assert!(query.responsibilities.is_none());
        assert!(query.skills.is_none());
    }

    #[test]
    fn test_free_text_is_trimmed_and_kept() {
        let query = JobQuery::from_parts(
            Some("Software Engineer".to_string()),
            Some("Technology".to_string()),
            Some("  code review, mentoring  ".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(query.responsibilities.as_deref(), Some("code review, mentoring"));
    }

    #[test]
    fn test_oversized_free_text_rejected() {
        let err = JobQuery::from_parts(
            Some("Software Engineer".to_string()),
            Some("Technology".to_string()),
            Some("x".repeat(2001)),
            None,
        )
        .unwrap_err();
        assert_eq!(err[0].field, "responsibilities");
    }

    #[test]
    fn test_unicode_titles_allowed() {
        assert!(title_and_industry("Ingénieur Logiciel", "Technologie").is_ok());
    }
}
