//! Aggregator: folds per-section analyses and the whole-document facets into
//! the final `ReviewResult`.
//!
//! overall_score = mean(section scores), one decimal
//! strengths / areas_to_improve = trimmed, de-duplicated, sorted union
//! categories (weighted mode) = Σ(weight × score) / Σ(weight) per category,
//!   skipping sections that scored 0 or carry no weight for that category

use std::collections::BTreeSet;

use crate::config::ScoringMode;
use crate::models::review::{
    Category, CategoryScores, DocumentAnalysis, ReviewResult, SectionAnalysis, SectionScore,
};

/// Per-section weights, ordered ATS Compatibility, Content Quality, Formatting.
/// Sections not listed weigh nothing.
const SECTION_WEIGHTS: [(&str, [f64; 3]); 9] = [
    ("Summary", [0.8, 0.7, 0.5]),
    ("Experience", [1.0, 1.0, 0.8]),
    ("Education", [0.6, 0.5, 0.6]),
    ("Skills", [1.0, 0.6, 0.5]),
    ("Projects", [0.5, 0.8, 0.5]),
    ("Certifications", [0.4, 0.05, 0.3]),
    ("Publications", [0.2, 0.4, 0.3]),
    ("Awards", [0.2, 0.3, 0.3]),
    ("Languages", [0.3, 0.1, 0.2]),
];

pub fn section_weight(name: &str, category: Category) -> f64 {
    let column = match category {
        Category::AtsCompatibility => 0,
        Category::ContentQuality => 1,
        Category::Formatting => 2,
    };
    SECTION_WEIGHTS
        .iter()
        .find(|(section, _)| *section == name)
        .map_or(0.0, |(_, weights)| weights[column])
}

/// Builds the final result. The document facets are merged as given.
pub fn assemble(
    sections: Vec<SectionAnalysis>,
    document: DocumentAnalysis,
    mode: ScoringMode,
) -> ReviewResult {
    let categories = match mode {
        ScoringMode::Mean => None,
        ScoringMode::Weighted => Some(category_scores(&sections)),
    };

    let strengths = merge_feedback(sections.iter().map(|s| s.strengths.as_slice()));
    let areas_to_improve = merge_feedback(sections.iter().map(|s| s.areas_to_improve.as_slice()));

    let sections: Vec<SectionScore> = sections
        .into_iter()
        .map(|s| SectionScore {
            name: s.name,
            score: s.score.clamp(0.0, 100.0),
            suggestions: s.suggestions,
        })
        .collect();

    ReviewResult {
        overall_score: overall_score(&sections),
        categories,
        strengths,
        areas_to_improve,
        sections,
        document,
    }
}

/// Mean of the section scores rounded to one decimal; 0.0 with no sections.
pub fn overall_score(sections: &[SectionScore]) -> f64 {
    if sections.is_empty() {
        return 0.0;
    }
    let total: f64 = sections.iter().map(|s| s.score).sum();
    round1(total / sections.len() as f64)
}

/// Union of feedback lists: entries trimmed, blanks dropped, duplicates
/// removed, sorted lexicographically.
pub fn merge_feedback<'a>(lists: impl Iterator<Item = &'a [String]>) -> Vec<String> {
    lists
        .flatten()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Weighted average per category. A section contributes its own
/// `section_scores` entry when the model gave one, else its overall score.
pub fn category_scores(sections: &[SectionAnalysis]) -> CategoryScores {
    let mut result = CategoryScores::default();

    for category in Category::ALL {
        let (weighted_sum, total_weight) = sections
            .iter()
            .map(|s| {
                let score = s
                    .section_scores
                    .map_or(s.score, |breakdown| breakdown.get(category));
                (section_weight(&s.name, category), score)
            })
            .filter(|(weight, score)| *weight > 0.0 && *score > 0.0)
            .fold((0.0, 0.0), |(sum, total), (weight, score)| {
                (sum + weight * score, total + weight)
            });

        let average = if total_weight > 0.0 {
            round1(weighted_sum / total_weight)
        } else {
            0.0
        };
        result.set(category, average);
    }

    result
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
