//! INI reading and writing
//!
//! A small, ordered section/key-value format used for the config and
//! saved-hosts files:
//!
//! ```text
//! [section]
//! sKey = value
//! ; comment
//! # also a comment
//! ```
//!
//! Sections and keys keep their insertion order so files round-trip in a
//! stable layout. Values are stored verbatim (trimmed); there is no quoting
//! or escaping.

use crate::error::{RconError, Result};

/// One `[section]` of an INI document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or replace a value
    pub fn set(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An ordered INI document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an INI document from text.
    ///
    /// Keys that appear before any `[section]` header go into an unnamed
    /// section with an empty name.
    pub fn parse(text: &str) -> Result<Self> {
        let mut doc = Document::new();
        let mut current: Option<Section> = None;

        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[') {
                let name = name.strip_suffix(']').ok_or_else(|| {
                    RconError::Config(format!(
                        "line {}: unterminated section header: {}",
                        lineno + 1,
                        raw.trim()
                    ))
                })?;
                if let Some(done) = current.take() {
                    doc.sections.push(done);
                }
                current = Some(Section::new(name.trim()));
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| {
                RconError::Config(format!(
                    "line {}: expected `key = value`, got: {}",
                    lineno + 1,
                    raw.trim()
                ))
            })?;
            current
                .get_or_insert_with(|| Section::new(""))
                .set(key.trim(), value.trim());
        }

        if let Some(done) = current.take() {
            doc.sections.push(done);
        }
        Ok(doc)
    }

    /// Render the document back to text
    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            if !section.name.is_empty() {
                out.push_str(&format!("[{}]\n", section.name));
            }
            for (key, value) in section.entries() {
                out.push_str(&format!("{} = {}\n", key, value));
            }
            out.push('\n');
        }
        out
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Get a section, creating it if absent
    pub fn section_mut(&mut self, name: &str) -> &mut Section {
        if let Some(idx) = self.sections.iter().position(|s| s.name == name) {
            &mut self.sections[idx]
        } else {
            self.sections.push(Section::new(name));
            self.sections.last_mut().unwrap()
        }
    }

    /// Remove a section; returns whether it existed
    pub fn remove_section(&mut self, name: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.name != name);
        self.sections.len() != before
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Shorthand for `section(name).and_then(|s| s.get(key))`
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let doc = Document::parse("[target]\nsHost = 10.0.0.1\nsPort = 27015\n").unwrap();
        assert_eq!(doc.get("target", "sHost"), Some("10.0.0.1"));
        assert_eq!(doc.get("target", "sPort"), Some("27015"));
        assert_eq!(doc.get("target", "sPass"), None);
    }

    #[test]
    fn test_parse_comments_and_blanks() {
        let text = "\n# comment\n[a]\n; another\nkey = value\n\n";
        let doc = Document::parse(text).unwrap();
        assert_eq!(doc.get("a", "key"), Some("value"));
    }

    #[test]
    fn test_parse_rejects_bad_lines() {
        assert!(Document::parse("[unterminated\n").is_err());
        assert!(Document::parse("[a]\nno equals sign\n").is_err());
    }

    #[test]
    fn test_value_with_equals() {
        let doc = Document::parse("[a]\nkey = x=y\n").unwrap();
        assert_eq!(doc.get("a", "key"), Some("x=y"));
    }

    #[test]
    fn test_round_trip() {
        let mut doc = Document::new();
        let s = doc.section_mut("server one");
        s.set("sHost", "example.com");
        s.set("sPort", "25575");
        let reparsed = Document::parse(&doc.render()).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_set_replaces() {
        let mut doc = Document::new();
        doc.section_mut("a").set("k", "1");
        doc.section_mut("a").set("k", "2");
        assert_eq!(doc.get("a", "k"), Some("2"));
    }

    #[test]
    fn test_remove_section() {
        let mut doc = Document::parse("[a]\nk = 1\n[b]\nk = 2\n").unwrap();
        assert!(doc.remove_section("a"));
        assert!(!doc.remove_section("a"));
        assert!(doc.section("b").is_some());
    }
}
