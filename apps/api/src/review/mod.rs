//! Résumé review pipeline.
//!
//! Flow:
//!   1. Text → normalize → split on headings  |  Document → flatten per kind
//!   2. Each section → prompt → LLM gateway → tolerant JSON parse → normalize
//!   3. Whole document → one ATS / content / formatting pass
//!   4. Aggregate → ReviewResult
//!
//! Any unit that fails degrades to a zero-score placeholder; a review request
//! only ever fails on bad input.

pub mod aggregate;
pub mod analyzer;
pub mod flatten;
pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod sections;
pub mod service;
pub mod splitter;
pub mod text;
