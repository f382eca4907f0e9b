use serde::{Deserialize, Serialize};

/// The three whole-résumé quality dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    AtsCompatibility,
    ContentQuality,
    Formatting,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::AtsCompatibility,
        Category::ContentQuality,
        Category::Formatting,
    ];

    /// Label used both in prompts and as the `categories` key.
    pub fn label(self) -> &'static str {
        match self {
            Category::AtsCompatibility => "ATS Compatibility",
            Category::ContentQuality => "Content Quality",
            Category::Formatting => "Formatting",
        }
    }
}

/// One score per category, each in [0, 100].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    #[serde(rename = "ATS Compatibility")]
    pub ats_compatibility: f64,
    #[serde(rename = "Content Quality")]
    pub content_quality: f64,
    #[serde(rename = "Formatting")]
    pub formatting: f64,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::AtsCompatibility => self.ats_compatibility,
            Category::ContentQuality => self.content_quality,
            Category::Formatting => self.formatting,
        }
    }

    pub fn set(&mut self, category: Category, score: f64) {
        match category {
            Category::AtsCompatibility => self.ats_compatibility = score,
            Category::ContentQuality => self.content_quality = score,
            Category::Formatting => self.formatting = score,
        }
    }
}

/// Normalized critique of a single résumé section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionAnalysis {
    pub name: String,
    pub score: f64,
    pub strengths: Vec<String>,
    pub areas_to_improve: Vec<String>,
    pub suggestions: Vec<String>,
    /// Per-category breakdown, only requested in weighted scoring mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_scores: Option<CategoryScores>,
}

impl SectionAnalysis {
    /// Zero score, no feedback.
    pub fn placeholder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// One whole-document facet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetAnalysis {
    pub score: f64,
    pub summary: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    #[serde(rename = "atsCompatibility")]
    pub ats_compatibility: FacetAnalysis,
    #[serde(rename = "contentQuality")]
    pub content_quality: FacetAnalysis,
    #[serde(rename = "formattingAnalysis")]
    pub formatting_analysis: FacetAnalysis,
}

/// Per-section entry of the final result. Strengths and areas to improve are
/// folded into the top-level lists instead of being repeated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionScore {
    pub name: String,
    pub score: f64,
    pub suggestions: Vec<String>,
}

/// Final review returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub overall_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryScores>,
    pub strengths: Vec<String>,
    pub areas_to_improve: Vec<String>,
    pub sections: Vec<SectionScore>,
    #[serde(flatten)]
    pub document: DocumentAnalysis,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_review_result_wire_shape() {
        let result = ReviewResult {
            overall_score: 72.5,
            categories: None,
            strengths: vec!["Clear".to_string()],
            areas_to_improve: vec![],
            sections: vec![SectionScore {
                name: "Skills".to_string(),
                score: 72.5,
                suggestions: vec!["Group by domain".to_string()],
            }],
            document: DocumentAnalysis::default(),
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["overall_score"], json!(72.5));
        assert!(value.get("categories").is_none());
        assert_eq!(value["sections"][0]["name"], "Skills");
        assert!(value["sections"][0].get("strengths").is_none());
        assert_eq!(value["atsCompatibility"], json!({"score": 0.0, "summary": []}));
        assert_eq!(value["contentQuality"]["score"], json!(0.0));
        assert_eq!(value["formattingAnalysis"]["summary"], json!([]));
    }

    #[test]
    fn test_categories_use_display_labels() {
        let scores = CategoryScores {
            ats_compatibility: 80.0,
            content_quality: 70.0,
            formatting: 60.0,
        };
        let value = serde_json::to_value(scores).unwrap();
        assert_eq!(value["ATS Compatibility"], json!(80.0));
        assert_eq!(value["Content Quality"], json!(70.0));
        assert_eq!(value["Formatting"], json!(60.0));
    }

    #[test]
    fn test_category_accessors_round_trip() {
        let mut scores = CategoryScores::default();
        for (i, category) in Category::ALL.into_iter().enumerate() {
            scores.set(category, i as f64 * 10.0);
        }
        assert_eq!(scores.get(Category::AtsCompatibility), 0.0);
        assert_eq!(scores.get(Category::ContentQuality), 10.0);
        assert_eq!(scores.get(Category::Formatting), 20.0);
    }

    #[test]
    fn test_placeholder_is_zero_and_empty() {
        let p = SectionAnalysis::placeholder("Awards");
        assert_eq!(p.name, "Awards");
        assert_eq!(p.score, 0.0);
        assert!(p.strengths.is_empty() && p.areas_to_improve.is_empty() && p.suggestions.is_empty());
        assert!(p.section_scores.is_none());
    }
}
