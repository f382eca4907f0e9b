//! Named section text blocks shared by the splitter, the flattener and the
//! review pipeline.

/// Canonical section names, in document order.
pub const CANONICAL_ORDER: [&str; 9] = [
    "Summary",
    "Experience",
    "Education",
    "Skills",
    "Projects",
    "Certifications",
    "Publications",
    "Awards",
    "Languages",
];

/// Section name → rendered text, in encounter order.
///
/// A name is only ever present with non-blank text; `insert` silently drops
/// blank blocks so nothing downstream receives an empty section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatSections {
    entries: Vec<(String, String)>,
}

impl FlatSections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores trimmed `text` under `name`, replacing any previous value in place.
    pub fn insert(&mut self, name: impl Into<String>, text: impl AsRef<str>) {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return;
        }
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = text.to_string(),
            None => self.entries.push((name, text.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t.as_str())
    }

    #[cfg(test)]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), t.as_str()))
    }

    /// Every section's text joined with newlines, in encounter order.
    pub fn concatenated(&self) -> String {
        self.entries
            .iter()
            .map(|(_, t)| t.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders a single document: canonical sections first in their fixed
    /// order, then any other section in encounter order. Each block is the
    /// section name on its own line followed by its text.
    pub fn render_document(&self) -> String {
        let canonical = CANONICAL_ORDER
            .iter()
            .filter_map(|name| self.get(name).map(|text| (*name, text)));
        let extra = self
            .iter()
            .filter(|(name, _)| !CANONICAL_ORDER.contains(name));

        canonical
            .chain(extra)
            .map(|(name, text)| format!("{name}\n{text}"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
