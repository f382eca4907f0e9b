use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// POST {API_PREFIX}/export-pdf
///
/// Parks `data` under a fresh token, then has the renderer print the client's
/// preview page for that token.
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let template = req.template.filter(|t| !t.trim().is_empty());
    let data = req.data.filter(|d| !is_blank(d));
    let (Some(template), Some(data)) = (template, data) else {
        return Err(AppError::Validation("Missing template or data".to_string()));
    };

    let token = state.tokens.put(data);
    let url = preview_url(&state.config.export.client_base_url, &template, &token)?;
    info!("Exporting PDF: template={template}");

    let pdf = state.renderer.render(url.as_str()).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "attachment; filename=cv.pdf"),
        ],
        pdf,
    )
        .into_response())
}

/// GET {API_PREFIX}/cv-data/:token
pub async fn handle_cv_data(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.tokens.get(&token)?))
}

/// `{base}/preview?template=<template>&token=<token>`, query-encoded.
pub fn preview_url(base: &str, template: &str, token: &str) -> Result<Url, AppError> {
    let mut url = Url::parse(&format!("{base}/preview"))
        .with_context(|| format!("CLIENT_BASE_URL is not a valid URL: '{base}'"))?;
    url.query_pairs_mut()
        .append_pair("template", template)
        .append_pair("token", token);
    Ok(url)
}

/// Null, empty containers and empty strings count as missing data.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preview_url() {
        let url = preview_url("http://localhost:5173", "modern", "abc123").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5173/preview?template=modern&token=abc123"
        );
    }

    #[test]
    fn test_preview_url_encodes_template() {
        let url = preview_url("https://cv.example.com", "two column&x=1", "t").unwrap();
        assert_eq!(
            url.as_str(),
            "https://cv.example.com/preview?template=two+column%26x%3D1&token=t"
        );
    }

    #[test]
    fn test_preview_url_rejects_bad_base() {
        assert!(matches!(
            preview_url("not a url", "modern", "t"),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_blank_payloads() {
        assert!(is_blank(&json!(null)));
        assert!(is_blank(&json!({})));
        assert!(is_blank(&json!([])));
        assert!(is_blank(&json!("")));
        assert!(!is_blank(&json!({"name": "Ada"})));
        assert!(!is_blank(&json!(0)));
    }
}
