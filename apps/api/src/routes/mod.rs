pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::export::handlers as export;
use crate::review::handlers as review;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let prefix = state.config.api_prefix.clone();

    let api = Router::new()
        .route("/review", post(review::handle_review))
        .route("/export-pdf", post(export::handle_export_pdf))
        .route("/cv-data/:token", get(export::handle_cv_data));

    Router::new()
        .route("/health", get(health::health_handler))
        .nest(&prefix, api)
        .with_state(state)
}
