//! Canonical analysis schema (v1) and the structural validator.
//!
//! One schema version, numeric scores everywhere. The historical endpoint
//! drafts that used qualitative "high"/"medium"/"low" levels are superseded,
//! not supported.
//!
//! Validation is a pure function of its input. It accumulates every
//! violation (field path, expected, found) rather than stopping at the
//! first, so one failed response yields one complete diagnostic.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ────────────────────────────────────────────────────────────────────────────
// Typed result
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overview: Overview,
    pub responsibilities: Responsibilities,
    pub skills: Skills,
    /// Backfilled to empty by the validator when the provider omits it.
    #[serde(default)]
    pub opportunities: Vec<Opportunity>,
    /// Backfilled to empty by the validator when the provider omits it.
    #[serde(default)]
    pub threats: Vec<Threat>,
    pub recommendations: Recommendations,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub impact_score: u8,
    pub summary: String,
    pub timeframe: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Responsibilities {
    pub current: Vec<CurrentResponsibility>,
    pub emerging: Vec<EmergingResponsibility>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentResponsibility {
    pub task: String,
    pub automation_risk: u8,
    pub reasoning: String,
    pub timeline: String,
    pub human_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergingResponsibility {
    pub task: String,
    pub importance: u8,
    pub timeline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skills {
    pub current: Vec<CurrentSkill>,
    pub recommended: Vec<RecommendedSkill>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSkill {
    pub skill: String,
    pub current_relevance: u8,
    pub future_relevance: u8,
    pub automation_risk: u8,
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedSkill {
    pub skill: String,
    pub importance: u8,
    pub timeline: String,
    pub resources: Vec<LearningResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningResource {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub link: String,
    pub duration: String,
    pub cost: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub title: String,
    pub description: String,
    pub action_items: Vec<String>,
    pub timeline: String,
    pub potential_outcome: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Threat {
    pub title: String,
    pub description: String,
    pub risk_level: u8,
    pub mitigation_steps: Vec<String>,
    pub timeline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub immediate: Vec<ActionRecommendation>,
    pub short_term: Vec<ActionRecommendation>,
    pub long_term: Vec<ActionRecommendation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecommendation {
    pub action: String,
    pub reasoning: String,
    pub resources: Vec<String>,
    pub expected_outcome: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Violations
// ────────────────────────────────────────────────────────────────────────────

/// A single schema violation at a field path.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub path: String,
    pub expected: &'static str,
    pub found: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`: expected {}, found {}", self.path, self.expected, self.found)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Validator
// ────────────────────────────────────────────────────────────────────────────

/// Validates a parsed JSON value against the canonical schema and, on
/// success, deserializes it into the typed `AnalysisResult`.
///
/// `opportunities` and `threats` are backfilled to empty arrays when absent
/// (backward compatibility with older completions); every other required
/// field is strict — nothing else is defaulted.
pub fn validate(mut value: Value) -> Result<AnalysisResult, Vec<Violation>> {
    backfill_optional_arrays(&mut value);

    let mut violations = Vec::new();
    check_root(&value, &mut violations);
    if !violations.is_empty() {
        return Err(violations);
    }

    serde_json::from_value(value).map_err(|e| {
        vec![Violation {
            path: "$".to_string(),
            expected: "a payload matching the analysis schema",
            found: e.to_string(),
        }]
    })
}

fn backfill_optional_arrays(value: &mut Value) {
    if let Some(obj) = value.as_object_mut() {
        for key in ["opportunities", "threats"] {
            // An explicit null counts as absent here, same as a missing key
            if obj.get(key).map_or(true, Value::is_null) {
                obj.insert(key.to_string(), Value::Array(Vec::new()));
            }
        }
    }
}

fn check_root(value: &Value, violations: &mut Vec<Violation>) {
    let Some(root) = as_object(value, "$", violations) else {
        return;
    };

    if let Some(overview) = require(root, "overview", violations) {
        check_overview(overview, violations);
    }
    if let Some(responsibilities) = require(root, "responsibilities", violations) {
        check_responsibilities(responsibilities, violations);
    }
    if let Some(skills) = require(root, "skills", violations) {
        check_skills(skills, violations);
    }
    if let Some(opportunities) = require(root, "opportunities", violations) {
        check_array(opportunities, "opportunities", false, violations, check_opportunity);
    }
    if let Some(threats) = require(root, "threats", violations) {
        check_array(threats, "threats", false, violations, check_threat);
    }
    if let Some(recommendations) = require(root, "recommendations", violations) {
        check_recommendations(recommendations, violations);
    }
}

fn check_overview(value: &Value, violations: &mut Vec<Violation>) {
    let Some(obj) = as_object(value, "overview", violations) else {
        return;
    };
    check_score_field(obj, "overview", "impactScore", violations);
    check_string_field(obj, "overview", "summary", violations);
    check_string_field(obj, "overview", "timeframe", violations);
}

fn check_responsibilities(value: &Value, violations: &mut Vec<Violation>) {
    let Some(obj) = as_object(value, "responsibilities", violations) else {
        return;
    };
    if let Some(current) = require(obj, "responsibilities.current", violations) {
        check_array(current, "responsibilities.current", true, violations, |item, path, v| {
            let Some(item) = as_object(item, path, v) else { return };
            check_string_field(item, path, "task", v);
            check_score_field(item, path, "automationRisk", v);
            check_string_field(item, path, "reasoning", v);
            check_string_field(item, path, "timeline", v);
            check_string_field(item, path, "humanValue", v);
        });
    }
    if let Some(emerging) = require(obj, "responsibilities.emerging", violations) {
        check_array(emerging, "responsibilities.emerging", true, violations, |item, path, v| {
            let Some(item) = as_object(item, path, v) else { return };
            check_string_field(item, path, "task", v);
            check_score_field(item, path, "importance", v);
            check_string_field(item, path, "timeline", v);
            // reasoning is optional on emerging tasks, but must be a string when present
            if let Some(reasoning) = item.get("reasoning") {
                if !reasoning.is_null() && !reasoning.is_string() {
                    v.push(Violation {
                        path: format!("{path}.reasoning"),
                        expected: "a string",
                        found: type_name(reasoning).to_string(),
                    });
                }
            }
        });
    }
}

fn check_skills(value: &Value, violations: &mut Vec<Violation>) {
    let Some(obj) = as_object(value, "skills", violations) else {
        return;
    };
    if let Some(current) = require(obj, "skills.current", violations) {
        check_array(current, "skills.current", true, violations, |item, path, v| {
            let Some(item) = as_object(item, path, v) else { return };
            check_string_field(item, path, "skill", v);
            check_score_field(item, path, "currentRelevance", v);
            check_score_field(item, path, "futureRelevance", v);
            check_score_field(item, path, "automationRisk", v);
            check_string_field(item, path, "reasoning", v);
        });
    }
    if let Some(recommended) = require(obj, "skills.recommended", violations) {
        check_array(recommended, "skills.recommended", true, violations, |item, path, v| {
            let Some(item) = as_object(item, path, v) else { return };
            check_string_field(item, path, "skill", v);
            check_score_field(item, path, "importance", v);
            check_string_field(item, path, "timeline", v);
            if let Some(resources) = require_at(item, path, "resources", v) {
                let resources_path = format!("{path}.resources");
                check_array(resources, &resources_path, false, v, check_learning_resource);
            }
        });
    }
}

fn check_learning_resource(value: &Value, path: &str, violations: &mut Vec<Violation>) {
    let Some(obj) = as_object(value, path, violations) else {
        return;
    };
    for key in ["name", "type", "link", "duration", "cost"] {
        check_string_field(obj, path, key, violations);
    }
}

fn check_opportunity(value: &Value, path: &str, violations: &mut Vec<Violation>) {
    let Some(obj) = as_object(value, path, violations) else {
        return;
    };
    check_string_field(obj, path, "title", violations);
    check_string_field(obj, path, "description", violations);
    check_string_array_field(obj, path, "actionItems", violations);
    check_string_field(obj, path, "timeline", violations);
    check_string_field(obj, path, "potentialOutcome", violations);
}

fn check_threat(value: &Value, path: &str, violations: &mut Vec<Violation>) {
    let Some(obj) = as_object(value, path, violations) else {
        return;
    };
    check_string_field(obj, path, "title", violations);
    check_string_field(obj, path, "description", violations);
    check_score_field(obj, path, "riskLevel", violations);
    check_string_array_field(obj, path, "mitigationSteps", violations);
    check_string_field(obj, path, "timeline", violations);
}

fn check_recommendations(value: &Value, violations: &mut Vec<Violation>) {
    let Some(obj) = as_object(value, "recommendations", violations) else {
        return;
    };
    for bucket in ["immediate", "shortTerm", "longTerm"] {
        let path = format!("recommendations.{bucket}");
        if let Some(items) = require(obj, &path, violations) {
            check_array(items, &path, true, violations, |item, path, v| {
                let Some(item) = as_object(item, path, v) else { return };
                check_string_field(item, path, "action", v);
                check_string_field(item, path, "reasoning", v);
                check_string_array_field(item, path, "resources", v);
                check_string_field(item, path, "expectedOutcome", v);
            });
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Walk helpers
// ────────────────────────────────────────────────────────────────────────────

fn as_object<'a>(
    value: &'a Value,
    path: &str,
    violations: &mut Vec<Violation>,
) -> Option<&'a Map<String, Value>> {
    match value.as_object() {
        Some(obj) => Some(obj),
        None => {
            violations.push(Violation {
                path: path.to_string(),
                expected: "an object",
                found: type_name(value).to_string(),
            });
            None
        }
    }
}

/// Looks up `path`'s final segment in `obj`; records a violation when absent
/// or null. `path` is the full dotted path of the field being required.
fn require<'a>(
    obj: &'a Map<String, Value>,
    path: &str,
    violations: &mut Vec<Violation>,
) -> Option<&'a Value> {
    let key = path.rsplit('.').next().unwrap_or(path);
    match obj.get(key) {
        Some(value) if !value.is_null() => Some(value),
        _ => {
            violations.push(Violation {
                path: path.to_string(),
                expected: "a required field",
                found: "missing".to_string(),
            });
            None
        }
    }
}

fn require_at<'a>(
    obj: &'a Map<String, Value>,
    parent: &str,
    key: &str,
    violations: &mut Vec<Violation>,
) -> Option<&'a Value> {
    match obj.get(key) {
        Some(value) if !value.is_null() => Some(value),
        _ => {
            violations.push(Violation {
                path: format!("{parent}.{key}"),
                expected: "a required field",
                found: "missing".to_string(),
            });
            None
        }
    }
}

fn check_string_field(
    obj: &Map<String, Value>,
    parent: &str,
    key: &str,
    violations: &mut Vec<Violation>,
) {
    let path = format!("{parent}.{key}");
    match obj.get(key) {
        Some(Value::String(_)) => {}
        Some(other) if !other.is_null() => violations.push(Violation {
            path,
            expected: "a string",
            found: type_name(other).to_string(),
        }),
        _ => violations.push(Violation {
            path,
            expected: "a string",
            found: "missing".to_string(),
        }),
    }
}

/// A score is an integer within 0–100. Floats and out-of-range numbers are
/// violations, not clamped.
fn check_score_field(
    obj: &Map<String, Value>,
    parent: &str,
    key: &str,
    violations: &mut Vec<Violation>,
) {
    let path = format!("{parent}.{key}");
    match obj.get(key) {
        Some(value @ Value::Number(_)) => match value.as_u64() {
            Some(n) if n <= 100 => {}
            _ => violations.push(Violation {
                path,
                expected: "an integer between 0 and 100",
                found: value.to_string(),
            }),
        },
        Some(other) if !other.is_null() => violations.push(Violation {
            path,
            expected: "an integer between 0 and 100",
            found: type_name(other).to_string(),
        }),
        _ => violations.push(Violation {
            path,
            expected: "an integer between 0 and 100",
            found: "missing".to_string(),
        }),
    }
}

fn check_string_array_field(
    obj: &Map<String, Value>,
    parent: &str,
    key: &str,
    violations: &mut Vec<Violation>,
) {
    let path = format!("{parent}.{key}");
    match obj.get(key) {
        Some(Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                if !item.is_string() {
                    violations.push(Violation {
                        path: format!("{path}[{i}]"),
                        expected: "a string",
                        found: type_name(item).to_string(),
                    });
                }
            }
        }
        Some(other) if !other.is_null() => violations.push(Violation {
            path,
            expected: "an array of strings",
            found: type_name(other).to_string(),
        }),
        _ => violations.push(Violation {
            path,
            expected: "an array of strings",
            found: "missing".to_string(),
        }),
    }
}

fn check_array(
    value: &Value,
    path: &str,
    require_non_empty: bool,
    violations: &mut Vec<Violation>,
    check_item: impl Fn(&Value, &str, &mut Vec<Violation>),
) {
    let Some(items) = value.as_array() else {
        violations.push(Violation {
            path: path.to_string(),
            expected: "an array",
            found: type_name(value).to_string(),
        });
        return;
    };

    if require_non_empty && items.is_empty() {
        violations.push(Violation {
            path: path.to_string(),
            expected: "a non-empty array",
            found: "an empty array".to_string(),
        });
        return;
    }

    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{path}[{i}]");
        check_item(item, &item_path, violations);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
