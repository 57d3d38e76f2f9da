// All LLM prompt constants for the analysis module.
// Reuses the cross-cutting JSON-only fragment from llm_client::prompts.

use crate::analysis::query::JobQuery;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// Analyst persona and realism rules, including the impact-score banding the
/// model must follow.
pub const ANALYSIS_PERSONA: &str = "\
You are an AI job impact analyst. Provide a realistic and practical analysis of how AI will impact the given job role.

GUIDELINES:
1. Be realistic and specific about AI capabilities - avoid generic claims that AI cannot replicate \"human creativity\" or \"problem-solving\"
2. Focus on concrete tasks AI can and cannot do, with specific examples
3. For software roles, acknowledge that AI can handle many programming tasks including debugging, testing, and architecture design
4. Impact scores must reflect the significant disruption AI will bring:
   - 80-100: jobs highly vulnerable to automation (e.g., data entry, basic coding)
   - 50-70: jobs partially automatable but requiring human oversight
   - 10-40: jobs where AI primarily augments rather than replaces
5. Give specific, actionable recommendations rather than general advice
6. Learning resources must name actual courses and platforms with real links";

/// Formatting rules that reduce the repair work the normalizer has to do.
pub const FORMAT_RULES: &str = "\
CRITICAL JSON FORMATTING RULES:
1. Do not use trailing commas
2. Always close every array and object
3. Use double quotes for all strings
4. Keep string values concise to avoid truncation
5. Every array must have at least one element
6. All numeric scores are integers between 0 and 100
7. All required fields must be present and non-null";

/// The exact canonical response shape. Numeric scores everywhere — earlier
/// qualitative high/medium/low drafts are superseded by this schema.
pub const RESPONSE_SCHEMA: &str = r#"Required response format:
{
  "overview": {
    "impactScore": <integer 0-100>,
    "summary": "<realistic assessment of AI impact>",
    "timeframe": "<specific timeline for changes>"
  },
  "responsibilities": {
    "current": [
      {
        "task": "<specific task description>",
        "automationRisk": <integer 0-100>,
        "reasoning": "<concrete explanation with examples>",
        "timeline": "<specific timeline>",
        "humanValue": "<specific aspects that still need human input>"
      }
    ],
    "emerging": [
      {
        "task": "<specific new task>",
        "importance": <integer 0-100>,
        "timeline": "<specific timeline>",
        "reasoning": "<why this task is emerging>"
      }
    ]
  },
  "skills": {
    "current": [
      {
        "skill": "<specific skill>",
        "currentRelevance": <integer 0-100>,
        "futureRelevance": <integer 0-100>,
        "automationRisk": <integer 0-100>,
        "reasoning": "<how AI will impact this skill>"
      }
    ],
    "recommended": [
      {
        "skill": "<specific skill>",
        "importance": <integer 0-100>,
        "timeline": "<specific timeline>",
        "resources": [
          {
            "name": "<actual course/resource name>",
            "type": "<specific type>",
            "link": "<actual URL>",
            "duration": "<specific duration>",
            "cost": "<actual cost>"
          }
        ]
      }
    ]
  },
  "opportunities": [
    {
      "title": "<specific opportunity>",
      "description": "<detailed description with examples>",
      "actionItems": ["<specific action 1>", "<specific action 2>"],
      "timeline": "<specific timeline>",
      "potentialOutcome": "<concrete expected outcome>"
    }
  ],
  "threats": [
    {
      "title": "<specific threat>",
      "description": "<detailed description with examples>",
      "riskLevel": <integer 0-100>,
      "mitigationSteps": ["<specific step 1>", "<specific step 2>"],
      "timeline": "<specific timeline>"
    }
  ],
  "recommendations": {
    "immediate": [
      {
        "action": "<specific action>",
        "reasoning": "<concrete reasoning>",
        "resources": ["<specific resource 1>", "<specific resource 2>"],
        "expectedOutcome": "<specific outcome>"
      }
    ],
    "shortTerm": [
      {
        "action": "<specific action>",
        "reasoning": "<concrete reasoning>",
        "resources": ["<specific resource 1>", "<specific resource 2>"],
        "expectedOutcome": "<specific outcome>"
      }
    ],
    "longTerm": [
      {
        "action": "<specific action>",
        "reasoning": "<concrete reasoning>",
        "resources": ["<specific resource 1>", "<specific resource 2>"],
        "expectedOutcome": "<specific outcome>"
      }
    ]
  }
}"#;

/// Composes the full system instruction for the analysis call.
pub fn analysis_system() -> String {
    format!("{ANALYSIS_PERSONA}\n\n{JSON_ONLY_SYSTEM}\n\n{FORMAT_RULES}\n\n{RESPONSE_SCHEMA}")
}

/// Builds the user instruction. Pure and deterministic: the job title and
/// industry always appear verbatim; the optional free-text sections are
/// appended only when present.
pub fn build_user_prompt(query: &JobQuery) -> String {
    let mut prompt = format!(
        "Analyze the AI impact for a {} in the {} industry.",
        query.job_title, query.industry
    );

    if let Some(responsibilities) = &query.responsibilities {
        prompt.push_str(&format!("\n\nKey responsibilities: {responsibilities}"));
    }

    if let Some(skills) = &query.skills {
        prompt.push_str(&format!("\n\nCurrent skills: {skills}"));
    }

    prompt.push_str(
        "\n\nProvide a comprehensive analysis including:\n\
         1. Overview with impact score (0-100) and timeline\n\
         2. Current responsibilities and their automation risk\n\
         3. Emerging responsibilities\n\
         4. Current skills assessment\n\
         5. Recommended skills with learning resources\n\
         6. Opportunities\n\
         7. Threats\n\
         8. Immediate, short-term, and long-term recommendations",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(
        responsibilities: Option<&str>,
        skills: Option<&str>,
    ) -> JobQuery {
        JobQuery::from_parts(
            Some("Software Engineer".to_string()),
            Some("Technology".to_string()),
            responsibilities.map(String::from),
            skills.map(String::from),
        )
        .unwrap()
    }

    #[test]
    fn test_prompt_contains_title_and_industry_verbatim() {
        let prompt = build_user_prompt(&query(None, None));
        assert!(prompt.contains("Software Engineer"));
        assert!(prompt.contains("Technology"));
    }

    #[test]
    fn test_prompt_omits_absent_optional_sections() {
        let prompt = build_user_prompt(&query(None, None));
        assert!(!prompt.contains("Key responsibilities:"));
        assert!(!prompt.contains("Current skills:"));
    }

    #[test]
    fn test_prompt_includes_present_optional_sections() {
        let prompt = build_user_prompt(&query(
            Some("code review, system design"),
            Some("Rust, SQL"),
        ));
        assert!(prompt.contains("Key responsibilities: code review, system design"));
        assert!(prompt.contains("Current skills: Rust, SQL"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let q = query(Some("code review"), None);
        assert_eq!(build_user_prompt(&q), build_user_prompt(&q));
    }

    #[test]
    fn test_prompt_lists_all_report_sections() {
        let prompt = build_user_prompt(&query(None, None));
        for section in [
            "Overview",
            "Current responsibilities",
            "Emerging responsibilities",
            "skills assessment",
            "Recommended skills",
            "Opportunities",
            "Threats",
            "long-term recommendations",
        ] {
            assert!(prompt.contains(section), "missing section: {section}");
        }
    }

    #[test]
    fn test_system_prompt_embeds_schema_and_json_rules() {
        let system = analysis_system();
        for key in [
            "impactScore",
            "automationRisk",
            "currentRelevance",
            "futureRelevance",
            "actionItems",
            "mitigationSteps",
            "shortTerm",
            "longTerm",
        ] {
            assert!(system.contains(key), "missing schema key: {key}");
        }
        assert!(system.contains("valid JSON"));
        assert!(system.contains("80-100"));
    }
}
