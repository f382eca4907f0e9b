//! Single-unit analyses: one section, or the whole document.
//!
//! Each call makes exactly one gateway request and always produces a record.
//! Transport failures and unreadable replies come back as `Degraded` with a
//! zero-score placeholder; they never propagate.

use serde_json::{Map, Value};
use tracing::warn;

use crate::llm_client::LlmGateway;
use crate::models::review::{Category, CategoryScores, DocumentAnalysis, FacetAnalysis, SectionAnalysis};
use crate::review::parser::{extract_json, safe_number, string_list};
use crate::review::prompts::{document_prompt, section_prompt};

/// Outcome of analyzing one unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis<T> {
    Complete(T),
    /// The unit failed; `placeholder` carries score 0 and empty feedback.
    Degraded { placeholder: T, reason: String },
}

impl<T> Analysis<T> {
    pub fn degraded(placeholder: T, reason: impl Into<String>) -> Self {
        Analysis::Degraded {
            placeholder,
            reason: reason.into(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Analysis::Degraded { .. })
    }

    pub fn into_inner(self) -> T {
        match self {
            Analysis::Complete(value) => value,
            Analysis::Degraded { placeholder, .. } => placeholder,
        }
    }
}

/// Critiques one section. `with_category_scores` switches on the weighted
/// schema variant.
pub async fn analyze_section(
    gateway: &dyn LlmGateway,
    name: &str,
    content: &str,
    model: &str,
    with_category_scores: bool,
) -> Analysis<SectionAnalysis> {
    let prompt = section_prompt(name, content, with_category_scores);

    let reply = match gateway.generate(&prompt, model).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Section analysis failed for '{name}': {e}");
            return Analysis::degraded(SectionAnalysis::placeholder(name), e.to_string());
        }
    };

    match extract_json(&reply) {
        Some(parsed) => Analysis::Complete(normalize_section(name, &parsed, with_category_scores)),
        None => {
            warn!(
                "Section analysis for '{name}' returned no readable JSON ({} chars)",
                reply.len()
            );
            Analysis::degraded(SectionAnalysis::placeholder(name), "model reply had no JSON object")
        }
    }
}

/// Runs the combined ATS / content / formatting pass over the whole document.
pub async fn analyze_document(
    gateway: &dyn LlmGateway,
    content: &str,
    model: &str,
) -> Analysis<DocumentAnalysis> {
    let prompt = document_prompt(content);

    let reply = match gateway.generate(&prompt, model).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Document analysis failed: {e}");
            return Analysis::degraded(DocumentAnalysis::default(), e.to_string());
        }
    };

    match extract_json(&reply) {
        Some(parsed) => Analysis::Complete(normalize_document(&parsed)),
        None => {
            warn!("Document analysis returned no readable JSON ({} chars)", reply.len());
            Analysis::degraded(DocumentAnalysis::default(), "model reply had no JSON object")
        }
    }
}

/// Coerces a parsed reply into a bounded `SectionAnalysis`. The record is
/// always named after the section that was asked about.
pub fn normalize_section(
    name: &str,
    parsed: &Map<String, Value>,
    with_category_scores: bool,
) -> SectionAnalysis {
    let score = safe_number(parsed.get("score"), 0.0);

    let section_scores = if with_category_scores {
        parsed
            .get("section_scores")
            .and_then(Value::as_object)
            .map(|breakdown| {
                let mut scores = CategoryScores::default();
                for category in Category::ALL {
                    // Missing categories inherit the section's own score.
                    scores.set(category, safe_number(breakdown.get(category.label()), score));
                }
                scores
            })
    } else {
        None
    };

    SectionAnalysis {
        name: name.to_string(),
        score,
        strengths: string_list(parsed.get("strengths")),
        areas_to_improve: string_list(parsed.get("areas_to_improve")),
        suggestions: string_list(parsed.get("suggestions")),
        section_scores,
    }
}

pub fn normalize_document(parsed: &Map<String, Value>) -> DocumentAnalysis {
    DocumentAnalysis {
        ats_compatibility: normalize_facet(parsed.get("atsCompatibility")),
        content_quality: normalize_facet(parsed.get("contentQuality")),
        formatting_analysis: normalize_facet(parsed.get("formattingAnalysis")),
    }
}

fn normalize_facet(value: Option<&Value>) -> FacetAnalysis {
    match value.and_then(Value::as_object) {
        Some(facet) => FacetAnalysis {
            score: safe_number(facet.get("score"), 0.0),
            summary: string_list(facet.get("summary")),
        },
        None => FacetAnalysis::default(),
    }
}
