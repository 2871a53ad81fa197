//! Labelled value extraction from a single line.
//!
//! Values such as `Email: senator.abetz@aph.gov.au` or
//! `Tel: (02) 6277 7700` sit at a roughly known column, but text
//! extraction shifts columns by a few characters between documents and
//! often leaves unrelated text on the same visual row (a fax number, a
//! `(fax)` annotation). The reader therefore treats the column as a hint
//! and ends the value at the first wide gap.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::lines::byte_offset;

/// How far left of the expected column a label may start.
pub const DEFAULT_COLUMN_DRIFT: usize = 8;

/// A run of two or more whitespace characters ends a value.
static VALUE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

/// A label token and the column it is expected near.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelField {
    /// Literal marker preceding the value (e.g. `"E-mail:"`).
    pub label: String,
    /// Character column the label usually starts at.
    pub column: usize,
}

impl LabelField {
    /// Reads this field from `line`, allowing `drift` columns of slack.
    #[must_use]
    pub fn read(&self, line: &str, drift: usize) -> Option<String> {
        read_labeled_field_with_drift(&self.label, self.column, drift, line)
    }

    /// Returns `true` if the label appears on `line` near its column,
    /// whether or not a value follows it.
    #[must_use]
    pub fn is_on(&self, line: &str, drift: usize) -> bool {
        locate_label(&self.label, self.column, drift, line).is_some()
    }

    /// Reads this field from the first line of `lines` that carries it.
    #[must_use]
    pub fn read_first<'a>(
        &self,
        lines: impl IntoIterator<Item = &'a str>,
        drift: usize,
    ) -> Option<String> {
        lines.into_iter().find_map(|line| self.read(line, drift))
    }
}

/// Returns the byte offset of the first `label` at or after
/// `expected_start_column - drift`.
#[must_use]
pub fn locate_label(
    label: &str,
    expected_start_column: usize,
    drift: usize,
    line: &str,
) -> Option<usize> {
    if label.is_empty() {
        return None;
    }

    let search_from = byte_offset(line, expected_start_column.saturating_sub(drift));
    line[search_from..]
        .find(label)
        .map(|found| search_from + found)
}

/// Reads the value following `label` in `line`, searching from
/// [`DEFAULT_COLUMN_DRIFT`] columns before `expected_start_column`.
///
/// Returns `None` if the label is not on the line or nothing follows it.
#[must_use]
pub fn read_labeled_field(label: &str, expected_start_column: usize, line: &str) -> Option<String> {
    read_labeled_field_with_drift(label, expected_start_column, DEFAULT_COLUMN_DRIFT, line)
}

/// Like [`read_labeled_field`] with an explicit column tolerance.
#[must_use]
pub fn read_labeled_field_with_drift(
    label: &str,
    expected_start_column: usize,
    drift: usize,
    line: &str,
) -> Option<String> {
    let label_at = locate_label(label, expected_start_column, drift, line)?;
    let rest = line[label_at + label.len()..].trim_start();

    let value = VALUE_END_RE
        .find(rest)
        .map_or(rest, |gap| &rest[..gap.start()])
        .trim_end();

    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}
