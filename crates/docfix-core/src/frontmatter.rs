//! Front matter date stamping.
//!
//! A front matter block is recognised only at byte offset 0: a `---` line,
//! any number of field lines, then the next `---` line. Detection walks the
//! document line by line, so a `---` block further down the body (a
//! horizontal rule, a YAML example inside a code fence) is never mistaken
//! for a header.
//!
//! Merging is terminal: once a document carries the date field it is never
//! rewritten, whatever timestamp a later run resolves.

use crate::constants::{DEFAULT_DATE_FIELD, FRONT_MATTER_MARKER};
use crate::types::Timestamp;

const BOM: char = '\u{feff}';

// ============================================================================
// FrontMatter
// ============================================================================

/// A located front matter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontMatter<'a> {
    content: &'a str,
    /// Byte offset where the field lines start (just after the opening line).
    fields_start: usize,
    /// Byte offset of the closing marker line.
    close_start: usize,
    /// Byte offset just past the closing marker line.
    end: usize,
}

impl<'a> FrontMatter<'a> {
    /// Locate the front matter block of `content`, if it has one.
    ///
    /// Returns `None` when the first line is not a marker, or when no closing
    /// marker follows it.
    pub fn parse(content: &'a str) -> Option<Self> {
        let start = bom_len(content);
        let mut lines = content[start..].split_inclusive('\n');
        let first = lines.next()?;
        if !is_marker(first) || !first.ends_with('\n') {
            return None;
        }

        let fields_start = start + first.len();
        let mut offset = fields_start;
        for line in lines {
            if is_marker(line) {
                return Some(Self {
                    content,
                    fields_start,
                    close_start: offset,
                    end: offset + line.len(),
                });
            }
            // A fence opener is never a field line: the leading `---` was a rule.
            if is_fence_opener(line) {
                return None;
            }
            offset += line.len();
        }

        None
    }

    /// Raw text of the field lines, without the markers.
    pub fn fields_text(&self) -> &'a str {
        &self.content[self.fields_start..self.close_start]
    }

    /// Top-level keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.fields_text().lines().filter_map(field_key)
    }

    /// Whether a top-level field named `key` exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.keys().any(|k| k == key)
    }

    /// Document text after the closing marker.
    pub fn body(&self) -> &'a str {
        &self.content[self.end..]
    }
}

/// A `---` line, trailing whitespace and line ending allowed.
fn is_marker(line: &str) -> bool {
    line.trim_end() == FRONT_MATTER_MARKER
}

/// An unindented backtick or tilde fence line.
fn is_fence_opener(line: &str) -> bool {
    line.starts_with("```") || line.starts_with("~~~")
}

/// Length of a leading UTF-8 byte order mark.
fn bom_len(content: &str) -> usize {
    if content.starts_with(BOM) {
        BOM.len_utf8()
    } else {
        0
    }
}

/// Key of a top-level `key: value` line.
///
/// Indented lines (nested values, block scalars), comments and list items
/// belong to some other field and yield `None`.
fn field_key(line: &str) -> Option<&str> {
    if line.starts_with(char::is_whitespace) || line.starts_with('#') || line.starts_with('-') {
        return None;
    }
    let (key, _) = line.split_once(':')?;
    let key = key.trim();
    let unquoted = key
        .strip_prefix('"')
        .and_then(|k| k.strip_suffix('"'))
        .or_else(|| key.strip_prefix('\'').and_then(|k| k.strip_suffix('\'')))
        .unwrap_or(key);
    (!unquoted.is_empty()).then_some(unquoted)
}

/// Line ending used by the document's first line (`\n` when there is none).
fn detect_eol(content: &str) -> &'static str {
    match content.find('\n') {
        Some(i) if content[..i].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

// ============================================================================
// Merging
// ============================================================================

/// Result of planning a date merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateMerge {
    /// The front matter already has the field; the document stays as is.
    AlreadyDated,
    /// The field was appended to the existing front matter.
    Augmented(String),
    /// A new front matter block was prepended.
    Created(String),
}

impl DateMerge {
    /// The new document text, if it changed.
    pub fn into_content(self) -> Option<String> {
        match self {
            Self::AlreadyDated => None,
            Self::Augmented(s) | Self::Created(s) => Some(s),
        }
    }
}

/// Whether `content` already carries `field` in its front matter.
pub fn has_date_field(content: &str, field: &str) -> bool {
    FrontMatter::parse(content).is_some_and(|fm| fm.contains_key(field))
}

/// Plan how `field: "<timestamp>"` gets into `content`.
///
/// - With no front matter (including an opening marker that is never
///   closed, or one that runs into a code fence), a new block holding only the field is prepended and the
///   original text follows byte for byte. A byte order mark stays first.
/// - With front matter lacking the field, the field is appended as its last
///   line; every other byte is preserved.
/// - With the field already present, nothing changes.
pub fn plan_date_merge(content: &str, timestamp: &Timestamp, field: &str) -> DateMerge {
    let eol = detect_eol(content);
    let line = format!("{}: \"{}\"{}", field, timestamp, eol);

    match FrontMatter::parse(content) {
        Some(fm) if fm.contains_key(field) => DateMerge::AlreadyDated,
        Some(fm) => {
            let mut merged = String::with_capacity(content.len() + line.len());
            merged.push_str(&content[..fm.close_start]);
            merged.push_str(&line);
            merged.push_str(&content[fm.close_start..]);
            DateMerge::Augmented(merged)
        }
        None => {
            let marker = FRONT_MATTER_MARKER;
            let (bom, rest) = content.split_at(bom_len(content));
            DateMerge::Created(format!("{bom}{marker}{eol}{line}{marker}{eol}{rest}"))
        }
    }
}

/// Add a `date` field to the document's front matter.
///
/// Returns `content` unchanged if the field already exists.
pub fn merge_date(content: &str, timestamp: &Timestamp) -> String {
    plan_date_merge(content, timestamp, DEFAULT_DATE_FIELD)
        .into_content()
        .unwrap_or_else(|| content.to_string())
}
