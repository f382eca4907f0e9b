// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments only.

/// Role line that opens every reviewer prompt.
pub const REVIEWER_ROLE: &str = "You are a CV reviewer.";

/// Closing instruction that asks for a bare JSON object.
/// Callers must still tolerate models that ignore it.
pub const JSON_ONLY_INSTRUCTION: &str = "Do NOT include any text outside the JSON.";
