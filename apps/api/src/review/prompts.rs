// All LLM prompt templates for the review module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, REVIEWER_ROLE};
use crate::models::review::Category;

/// Section critique template.
/// Replace: {role}, {name}, {section_scores}, {json_only}, {content}
const SECTION_PROMPT_TEMPLATE: &str = r#"{role} Analyze the '{name}' section below and provide feedback.

Return ONLY valid JSON with exactly this structure:
{
  "name": "{name}",
  "score": number,  // 0-100
  "strengths": [string],
  "areas_to_improve": [string],
  "suggestions": [string]{section_scores}
}

Guidelines:
- Score based on relevance, clarity, and impact
- Strengths: what works well
- Areas to improve: specific weaknesses
- Suggestions: actionable improvements

{json_only}

Section content:
"""
{content}
"""
"#;

/// Whole-résumé template covering all three facets in one pass.
/// Replace: {role}, {json_only}, {content}
const DOCUMENT_PROMPT_TEMPLATE: &str = r#"{role} In ONE pass, evaluate the resume for:
- ATS Compatibility
- Content Quality
- Formatting

Return ONLY valid JSON with exactly this structure:
{
  "atsCompatibility": {
    "score": number,  // 0-100
    "summary": [string]
  },
  "contentQuality": {
    "score": number,  // 0-100
    "summary": [string]
  },
  "formattingAnalysis": {
    "score": number,  // 0-100
    "summary": [string]
  }
}

Guidelines:
- ATS: section headings, simple formatting, keyword use, clear titles
- Content: measurable outcomes, specificity, coverage of key sections, action verbs
- Formatting: consistency in headings, bullets, whitespace, punctuation, date ranges

Provide concise bullet-style strings for each summary. {json_only}

Resume to analyze:
"""
{content}
"""
"#;

/// Builds the per-section prompt. With `with_category_scores` the schema also
/// asks for a `section_scores` object keyed by category label.
pub fn section_prompt(name: &str, content: &str, with_category_scores: bool) -> String {
    let section_scores = if with_category_scores {
        let fields = Category::ALL
            .iter()
            .map(|c| format!("    \"{}\": number", c.label()))
            .collect::<Vec<_>>()
            .join(",\n");
        format!(",\n  \"section_scores\": {{  // each 0-100\n{fields}\n  }}")
    } else {
        String::new()
    };

    // {content} must be substituted last; résumé text may contain braces.
    SECTION_PROMPT_TEMPLATE
        .replace("{role}", REVIEWER_ROLE)
        .replace("{name}", name)
        .replace("{section_scores}", &section_scores)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{content}", content)
}

/// Builds the whole-document ATS / content / formatting prompt.
pub fn document_prompt(content: &str) -> String {
    DOCUMENT_PROMPT_TEMPLATE
        .replace("{role}", REVIEWER_ROLE)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{content}", content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_prompt_embeds_name_and_content() {
        let prompt = section_prompt("Skills", "Go, Rust (Advanced)", false);
        assert!(prompt.starts_with("You are a CV reviewer. Analyze the 'Skills' section"));
        assert!(prompt.contains("\"name\": \"Skills\""));
        assert!(prompt.contains("\"\"\"\nGo, Rust (Advanced)\n\"\"\""));
        assert!(prompt.contains("\"areas_to_improve\": [string]"));
        assert!(prompt.contains(JSON_ONLY_INSTRUCTION));
        assert!(!prompt.contains("section_scores"));
        assert!(!prompt.contains("{content}"));
    }

    #[test]
    fn test_section_prompt_weighted_variant_requests_category_scores() {
        let prompt = section_prompt("Experience", "Acme", true);
        assert!(prompt.contains("\"section_scores\""));
        assert!(prompt.contains("\"ATS Compatibility\": number"));
        assert!(prompt.contains("\"Content Quality\": number"));
        assert!(prompt.contains("\"Formatting\": number"));
    }

    #[test]
    fn test_section_prompt_is_deterministic() {
        assert_eq!(section_prompt("Summary", "x", true), section_prompt("Summary", "x", true));
    }

    #[test]
    fn test_content_with_placeholders_is_left_verbatim() {
        let prompt = section_prompt("Summary", "I write {name} and {json_only}", false);
        assert!(prompt.contains("I write {name} and {json_only}"));
    }

    #[test]
    fn test_document_prompt_lists_three_facets() {
        let prompt = document_prompt("Summary\nEngineer");
        for key in ["\"atsCompatibility\"", "\"contentQuality\"", "\"formattingAnalysis\""] {
            assert!(prompt.contains(key), "missing {key}");
        }
        assert!(prompt.contains("\"\"\"\nSummary\nEngineer\n\"\"\""));
        assert!(prompt.contains(JSON_ONLY_INSTRUCTION));
    }
}
