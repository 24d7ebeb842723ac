//! Frontmatter parsing and writing.
//!
//! Handles the `---` delimited key/value block at the head of a vault
//! document. Format:
//! ```markdown
//! ---
//! status: Active
//! description: "Demo project"
//! created: 2025-02-10
//! ---
//!
//! # Alpha - Dashboard
//! ```
//!
//! This is deliberately not YAML. Each field is a single `key: value` line;
//! anything else inside the block is skipped.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Line that opens and closes a frontmatter block.
pub const DELIMITER: &str = "---";

/// Ordered key/value fields of a frontmatter block.
///
/// Keys keep the position of their first insertion; inserting an existing
/// key replaces its value (last wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    entries: Vec<(String, String)>,
}

impl Frontmatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Frontmatter::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Frontmatter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fm = Frontmatter::new();
        for (k, v) in iter {
            fm.insert(k, v);
        }
        fm
    }
}

impl Serialize for Frontmatter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Split a document into its frontmatter fields and body.
///
/// The block is recognised only when the first line is exactly `---`, and
/// ends at the next line that is exactly `---`. The body is everything after
/// the closing line. A document without an opening line, or whose block is
/// never closed, has no frontmatter: the fields are empty and the whole
/// document is the body.
#[must_use]
pub fn parse(content: &str) -> (Frontmatter, &str) {
    let mut lines = content.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return (Frontmatter::new(), content);
    };
    if !is_delimiter(first) {
        return (Frontmatter::new(), content);
    }

    let mut fields = Frontmatter::new();
    let mut offset = first.len();
    for line in lines {
        offset += line.len();
        if is_delimiter(line) {
            return (fields, &content[offset..]);
        }
        if let Some((key, value)) = parse_field(line) {
            fields.insert(key, value);
        }
    }

    // Unterminated block
    (Frontmatter::new(), content)
}

/// Write fields and body as a document with a frontmatter block.
///
/// Fields are emitted in insertion order. Line breaks inside values are
/// replaced with spaces; values that [`parse`] would otherwise alter are
/// wrapped in double quotes.
#[must_use]
pub fn format(fields: &Frontmatter, body: &str) -> String {
    let mut output = String::with_capacity(body.len() + 16 * (fields.len() + 2));
    output.push_str(DELIMITER);
    output.push('\n');
    for (key, value) in fields.iter() {
        output.push_str(key);
        output.push(':');
        let value = encode_value(value);
        if !value.is_empty() {
            output.push(' ');
            output.push_str(&value);
        }
        output.push('\n');
    }
    output.push_str(DELIMITER);
    output.push('\n');
    output.push_str(body);
    output
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']) == DELIMITER
}

fn parse_field(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_end_matches(['\n', '\r']);
    let (key, rest) = line.split_once(':')?;
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return None;
    }
    Some((key, unquote(rest.trim())))
}

fn is_quoted(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[0] == bytes[bytes.len() - 1]
}

fn unquote(value: &str) -> &str {
    if is_quoted(value) {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn encode_value(value: &str) -> String {
    let value = value.replace(['\r', '\n'], " ");
    if value.trim() != value || is_quoted(&value) {
        format!("\"{value}\"")
    } else {
        value
    }
}
