use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::models::review::ReviewResult;
use crate::review::service::ReviewInput;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default, alias = "resume")]
    pub sections: Option<ResumeDocument>,
    #[serde(default)]
    pub model: Option<String>,
}

impl ReviewRequest {
    /// Picks the input mode. Exactly one of a non-blank `resume_text` or a
    /// `sections` document must be supplied.
    pub fn into_input(self) -> Result<(ReviewInput, Option<String>), AppError> {
        let text = self.resume_text.filter(|t| !t.trim().is_empty());

        let input = match (text, self.sections) {
            (Some(text), None) => ReviewInput::Text(text),
            (None, Some(doc)) => ReviewInput::Document(doc),
            (Some(_), Some(_)) => {
                return Err(AppError::Validation(
                    "Provide either 'resume_text' or 'sections', not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(AppError::Validation(
                    "Provide 'resume_text' or 'sections'".to_string(),
                ))
            }
        };

        Ok((input, self.model))
    }
}

/// POST {API_PREFIX}/review
pub async fn handle_review(
    State(state): State<AppState>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<ReviewResult>, AppError> {
    let (input, model) = req.into_input()?;
    let result = state.review.review(input, model.as_deref()).await;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> ReviewRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_text_request() {
        let (input, model) = request(json!({"resume_text": "Summary\nx", "model": "llama3"}))
            .into_input()
            .unwrap();
        assert!(matches!(input, ReviewInput::Text(t) if t == "Summary\nx"));
        assert_eq!(model.as_deref(), Some("llama3"));
    }

    #[test]
    fn test_sections_request_and_resume_alias() {
        let body = json!({"skills": [{"name": "Go"}]});
        for key in ["sections", "resume"] {
            let (input, model) = request(json!({ key: body.clone() })).into_input().unwrap();
            match input {
                ReviewInput::Document(doc) => assert_eq!(doc.skills[0].name, "Go"),
                ReviewInput::Text(_) => panic!("expected structured input for '{key}'"),
            }
            assert!(model.is_none());
        }
    }

    #[test]
    fn test_neither_input_rejected() {
        let err = request(json!({"model": "x"})).into_input().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_blank_text_counts_as_missing() {
        let err = request(json!({"resume_text": "   \n"})).into_input().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let (input, _) = request(json!({"resume_text": "  ", "sections": {}}))
            .into_input()
            .unwrap();
        assert!(matches!(input, ReviewInput::Document(_)));
    }

    #[test]
    fn test_both_inputs_rejected() {
        let err = request(json!({"resume_text": "Summary\nx", "sections": {}}))
            .into_input()
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("not both")));
    }
}
