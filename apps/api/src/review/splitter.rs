//! Section Splitter: heuristically partitions pasted résumé text into
//! canonical sections by matching whole-line headings.

use std::sync::OnceLock;

use regex::Regex;

use crate::review::sections::FlatSections;
use crate::review::text::normalize_text;

/// Heading spellings per canonical section. Matching is case-insensitive and
/// whole-line; a trailing colon is tolerated.
const HEADING_FAMILIES: [(&str, &[&str]); 6] = [
    ("Summary", &["summary", "objective", "professional summary"]),
    (
        "Experience",
        &[
            "experience",
            "work experience",
            "employment history",
            "professional experience",
        ],
    ),
    ("Education", &["education", "academic background"]),
    (
        "Skills",
        &[
            "skills",
            "technical skills",
            "skills & competencies",
            "core competencies",
        ],
    ),
    ("Projects", &["projects", "key projects", "selected projects"]),
    ("Certifications", &["certifications", "licenses", "certificates"]),
];

struct HeadingPattern {
    name: &'static str,
    regex: Regex,
}

fn heading_patterns() -> &'static [HeadingPattern] {
    static PATTERNS: OnceLock<Vec<HeadingPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        HEADING_FAMILIES
            .iter()
            .map(|&(name, spellings)| {
                let alternation = spellings
                    .iter()
                    .map(|s| regex::escape(s).replace(' ', r"[ \t]+"))
                    .collect::<Vec<_>>()
                    .join("|");
                HeadingPattern {
                    name,
                    regex: Regex::new(&format!(r"(?im)^[ \t]*(?:{alternation})[ \t]*:?[ \t]*$"))
                        .expect("valid heading regex"),
                }
            })
            .collect()
    })
}

/// A heading occurrence: where it starts, where its line ends, what it names.
#[derive(Debug, Clone, Copy)]
struct Heading {
    start: usize,
    end: usize,
    name: &'static str,
}

/// Splits raw text into canonical sections.
///
/// Each heading owns the text from the end of its own line up to the next
/// heading of any kind (or the end of the text). Repeated headings of the same
/// kind are concatenated with a blank line in document order. Text before the
/// first heading is not attributed to any section. With no heading at all the
/// whole normalized text becomes `Summary`.
pub fn split_sections(raw: &str) -> FlatSections {
    let text = normalize_text(raw);
    let mut sections = FlatSections::new();

    let mut headings: Vec<Heading> = heading_patterns()
        .iter()
        .flat_map(|pattern| {
            pattern.regex.find_iter(&text).map(|m| Heading {
                start: m.start(),
                end: m.end(),
                name: pattern.name,
            })
        })
        .collect();

    if headings.is_empty() {
        sections.insert("Summary", &text);
        return sections;
    }

    headings.sort_by_key(|h| h.start);

    // Ordered (name, chunks) so repeated headings keep document order.
    let mut collected: Vec<(&'static str, Vec<&str>)> = Vec::new();
    for (i, heading) in headings.iter().enumerate() {
        let next_start = headings.get(i + 1).map_or(text.len(), |h| h.start);
        let body = text[heading.end..next_start].trim();
        if body.is_empty() {
            continue;
        }
        match collected.iter_mut().find(|(name, _)| *name == heading.name) {
            Some((_, chunks)) => chunks.push(body),
            None => collected.push((heading.name, vec![body])),
        }
    }

    for (name, chunks) in collected {
        sections.insert(name, chunks.join("\n\n"));
    }
    sections
}
