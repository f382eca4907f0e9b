//! Low-level cleanup for pasted résumé text.

use std::sync::OnceLock;

use regex::Regex;

/// Normalizes line endings to `\n`, collapses runs of horizontal whitespace
/// inside each line to a single space, trims every line and the whole text.
/// Blank lines are kept so paragraph breaks survive.
pub fn normalize_text(raw: &str) -> String {
    static RE_HSPACE: OnceLock<Regex> = OnceLock::new();
    let re_hspace = RE_HSPACE.get_or_init(|| Regex::new(r"[^\S\n]+").expect("valid regex"));

    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    unified
        .lines()
        .map(|line| re_hspace.replace_all(line, " ").trim().to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
