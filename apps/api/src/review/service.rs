//! ReviewService: runs the whole pipeline for one request.
//!
//! Sections are analyzed concurrently on a per-request `JoinSet`, bounded by a
//! semaphore. Dropping the future returned by `review` drops the set, which
//! aborts any analysis still in flight.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::config::{ReviewConfig, ScoringMode};
use crate::llm_client::LlmGateway;
use crate::models::resume::ResumeDocument;
use crate::models::review::{DocumentAnalysis, ReviewResult, SectionAnalysis};
use crate::review::aggregate::assemble;
use crate::review::analyzer::{analyze_document, analyze_section, Analysis};
use crate::review::flatten::flatten_document;
use crate::review::splitter::split_sections;
use crate::review::text::normalize_text;

/// Name of the section analyzed when the input yields no sections at all.
const FALLBACK_SECTION: &str = "Summary";

/// A review request that has already passed input validation.
#[derive(Debug, Clone)]
pub enum ReviewInput {
    /// Pasted résumé text, split on headings.
    Text(String),
    /// Structured résumé, flattened section by section.
    Document(ResumeDocument),
}

/// Result of one spawned unit of work.
enum Unit {
    Section(usize, Analysis<SectionAnalysis>),
    Document(Analysis<DocumentAnalysis>),
}

#[derive(Clone)]
pub struct ReviewService {
    gateway: Arc<dyn LlmGateway>,
    config: ReviewConfig,
}

impl ReviewService {
    pub fn new(gateway: Arc<dyn LlmGateway>, config: ReviewConfig) -> Self {
        Self { gateway, config }
    }

    /// Reviews one résumé. Never fails: every unit that cannot be analyzed is
    /// replaced by a zero-score placeholder.
    ///
    /// `model` overrides the configured default when it is non-blank.
    pub async fn review(&self, input: ReviewInput, model: Option<&str>) -> ReviewResult {
        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(self.config.default_model.as_str())
            .to_string();

        let (flat, document_text) = match input {
            ReviewInput::Text(raw) => {
                let normalized = normalize_text(&raw);
                (split_sections(&normalized), normalized)
            }
            ReviewInput::Document(doc) => {
                let flat = flatten_document(&doc);
                let rendered = flat.render_document();
                (flat, rendered)
            }
        };

        let units: Vec<(String, String)> = if flat.is_empty() {
            vec![(FALLBACK_SECTION.to_string(), flat.concatenated())]
        } else {
            flat.iter()
                .map(|(name, text)| (name.to_string(), text.to_string()))
                .collect()
        };

        let mode = self.config.scoring_mode;
        let with_category_scores = mode == ScoringMode::Weighted;
        info!(
            "Review started: model={model}, mode={mode:?}, sections={}",
            units.len()
        );

        let permits = Arc::new(Semaphore::new(self.config.concurrency));
        let mut tasks = JoinSet::new();

        for (idx, (name, content)) in units.iter().cloned().enumerate() {
            let gateway = Arc::clone(&self.gateway);
            let permits = Arc::clone(&permits);
            let model = model.clone();
            tasks.spawn(async move {
                // acquire only errors on a closed semaphore
                let _permit = permits.acquire_owned().await.ok();
                let analysis =
                    analyze_section(gateway.as_ref(), &name, &content, &model, with_category_scores)
                        .await;
                Unit::Section(idx, analysis)
            });
        }

        {
            let gateway = Arc::clone(&self.gateway);
            let model = model.clone();
            tasks.spawn(async move {
                Unit::Document(analyze_document(gateway.as_ref(), &document_text, &model).await)
            });
        }

        let mut slots: Vec<Option<SectionAnalysis>> = vec![None; units.len()];
        let mut document = None;
        let mut degraded = 0usize;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Unit::Section(idx, analysis)) => {
                    if analysis.is_degraded() {
                        degraded += 1;
                    }
                    slots[idx] = Some(analysis.into_inner());
                }
                Ok(Unit::Document(analysis)) => {
                    if analysis.is_degraded() {
                        degraded += 1;
                    }
                    document = Some(analysis.into_inner());
                }
                Err(e) => warn!("Review task did not complete: {e}"),
            }
        }

        let mut sections = Vec::with_capacity(units.len());
        for (slot, (name, _)) in slots.into_iter().zip(&units) {
            match slot {
                Some(analysis) => sections.push(analysis),
                None => {
                    warn!("Section '{name}' lost its analysis task; using placeholder");
                    degraded += 1;
                    sections.push(SectionAnalysis::placeholder(name));
                }
            }
        }
        let document = document.unwrap_or_else(|| {
            warn!("Document analysis task lost; using empty facets");
            degraded += 1;
            DocumentAnalysis::default()
        });

        let result = assemble(sections, document, mode);
        info!(
            "Review complete: overall_score={}, sections={}, degraded={degraded}",
            result.overall_score,
            result.sections.len()
        );
        result
    }
}
