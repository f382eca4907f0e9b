use std::sync::Arc;

use crate::config::Config;
use crate::export::renderer::PdfRenderer;
use crate::export::token_store::TokenStore;
use crate::review::service::ReviewService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub review: ReviewService,
    /// Export payloads waiting for the preview page to fetch them.
    pub tokens: Arc<TokenStore>,
    /// Pluggable PDF renderer. Default: HttpPdfRenderer.
    pub renderer: Arc<dyn PdfRenderer>,
    pub config: Config,
}
