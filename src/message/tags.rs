//! IRCv3 message tags.
//!
//! Tags are kept in the order they were received so that a parsed line
//! serializes back to the same bytes. Lookups follow IRCv3 semantics: when
//! a key repeats, the last value wins.

use std::fmt::{self, Display, Formatter, Write};

use crate::error::LineIssue;

/// A single IRCv3 tag: a key and an optional (unescaped) value.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag(
    /// Tag key (e.g. `time`, `+draft/reply`).
    pub String,
    /// Tag value, `None` for presence-only tags.
    pub Option<String>,
);

impl Tag {
    /// Create a new tag with a key and optional value.
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Tag(key.into(), value)
    }
}

/// The tag block of a message.
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tags(Vec<Tag>);

impl Tags {
    /// An empty tag block.
    pub fn new() -> Self {
        Tags(Vec::new())
    }

    /// Number of tag entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no tags are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a tag value. Value-less tags yield `Some("")`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|Tag(k, _)| k == key)
            .map(|Tag(_, v)| v.as_deref().unwrap_or(""))
    }

    /// Whether a key is present, with or without a value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|Tag(k, _)| k == key)
    }

    /// Set a tag, replacing every existing entry for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        if let Some(pos) = self.0.iter().position(|Tag(k, _)| *k == key) {
            self.0.retain(|Tag(k, _)| *k != key);
            self.0.insert(pos.min(self.0.len()), Tag(key, value));
        } else {
            self.0.push(Tag(key, value));
        }
    }

    /// Remove every entry for a key, returning the last value seen.
    pub fn remove(&mut self, key: &str) -> Option<Option<String>> {
        let mut removed = None;
        self.0.retain(|Tag(k, v)| {
            if k == key {
                removed = Some(v.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Iterate over the tags in wire order.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }
}

impl FromIterator<Tag> for Tags {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Tags(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Tags {
    /// Writes `k=v;k2` without the leading `@`.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, Tag(key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_char(';')?;
            }
            f.write_str(key)?;
            if let Some(value) = value {
                f.write_char('=')?;
                escape_tag_value(f, value)?;
            }
        }
        Ok(())
    }
}

/// Parse the raw tag block (without the leading `@`).
///
/// Entries with an empty key are dropped and reported; the rest of the
/// block still parses.
pub(crate) fn parse_tags(raw: &str, issues: &mut Vec<LineIssue>) -> Tags {
    raw.split(';')
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let (key, value) = match entry.split_once('=') {
                Some((key, value)) => (key, Some(unescape_tag_value(value))),
                None => (entry, None),
            };
            if key.is_empty() {
                issues.push(LineIssue::UnrecognizedTag(entry.to_owned()));
                return None;
            }
            Some(Tag(key.to_owned(), value))
        })
        .collect()
}

/// Escape a tag value for serialization.
///
/// Escapes special characters according to the IRCv3 message-tags spec.
pub fn escape_tag_value(f: &mut dyn Write, value: &str) -> fmt::Result {
    for c in value.chars() {
        match c {
            ';' => f.write_str("\\:")?,
            ' ' => f.write_str("\\s")?,
            '\\' => f.write_str("\\\\")?,
            '\r' => f.write_str("\\r")?,
            '\n' => f.write_str("\\n")?,
            c => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Unescape a tag value from wire format.
///
/// Unknown escapes drop the backslash; a lone trailing backslash is dropped.
pub fn unescape_tag_value(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut iter = value.chars();
    while let Some(c) = iter.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match iter.next() {
            Some(':') => unescaped.push(';'),
            Some('s') => unescaped.push(' '),
            Some('r') => unescaped.push('\r'),
            Some('n') => unescaped.push('\n'),
            Some(other) => unescaped.push(other),
            None => break,
        }
    }
    unescaped
}
