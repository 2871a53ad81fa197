//! Per-document layout configuration.
//!
//! The column positions, label tokens and party abbreviations that the
//! extractors rely on differ between the two directories and drift
//! between editions. They live in TOML files rather than in code so a new
//! edition can be handled by supplying a new layout. The layouts for the
//! current editions are embedded at compile time via [`include_str!`].

use std::path::Path;

use parl_contacts_models::Role;
use serde::{Deserialize, Serialize};

use crate::PdfError;
use crate::label_field::{DEFAULT_COLUMN_DRIFT, LabelField};

/// Embedded default layouts, one per role.
const LAYOUT_TOMLS: &[(Role, &str)] = &[
    (Role::Senator, include_str!("../layouts/senate.toml")),
    (
        Role::Representative,
        include_str!("../layouts/representatives.toml"),
    ),
];

const fn default_column_drift() -> usize {
    DEFAULT_COLUMN_DRIFT
}

/// Layout of one members directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DocumentLayout {
    /// House of Representatives directory.
    Representative(RepresentativeLayout),
    /// Senate directory.
    Senator(SenateLayout),
}

impl DocumentLayout {
    /// The role whose directory this layout describes.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Representative(_) => Role::Representative,
            Self::Senator(_) => Role::Senator,
        }
    }

    /// Number of records a complete parse of the document should yield,
    /// if known.
    #[must_use]
    pub const fn expected_records(&self) -> Option<usize> {
        match self {
            Self::Representative(layout) => layout.expected_records,
            Self::Senator(layout) => layout.expected_records,
        }
    }
}

/// Column layout of the Senate directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenateLayout {
    /// Columns of slack allowed left of every expected column.
    #[serde(default = "default_column_drift")]
    pub column_drift: usize,
    /// The state column never starts left of this column; name text does.
    pub state_min_column: usize,
    /// Column the electorate office phone number usually starts at.
    pub phone_column: usize,
    /// Senators listed in the edition this layout was written for.
    #[serde(default)]
    pub expected_records: Option<usize>,
    /// Email label and column.
    pub email: LabelField,
}

/// Column layout of the House of Representatives directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentativeLayout {
    /// Columns of slack allowed left of every expected column.
    #[serde(default = "default_column_drift")]
    pub column_drift: usize,
    /// Maximum indentation of a line that starts in the name column.
    pub name_indent_max: usize,
    /// Party abbreviations that follow an electorate name.
    pub parties: Vec<String>,
    /// Members listed in the edition this layout was written for.
    #[serde(default)]
    pub expected_records: Option<usize>,
    /// Phone label and column. A line carrying it anchors a new entry.
    pub phone: LabelField,
    /// Email label and column.
    pub email: LabelField,
}

/// Parses a layout from TOML.
///
/// # Errors
///
/// Returns [`PdfError::Layout`] if the TOML is malformed or does not
/// describe a known role.
pub fn parse_layout_toml(toml_str: &str) -> Result<DocumentLayout, PdfError> {
    Ok(toml::from_str(toml_str)?)
}

/// Returns the embedded layout for `role`.
///
/// # Panics
///
/// Panics if an embedded layout is malformed (the layouts are compiled
/// into the binary, so this is caught by the tests below).
#[must_use]
pub fn default_layout(role: Role) -> DocumentLayout {
    let (_, toml_str) = LAYOUT_TOMLS
        .iter()
        .find(|(layout_role, _)| *layout_role == role)
        .unwrap_or_else(|| panic!("no embedded layout for {role}"));

    parse_layout_toml(toml_str).unwrap_or_else(|e| panic!("Failed to parse {role} layout: {e}"))
}

/// Reads a layout from a TOML file.
///
/// # Errors
///
/// Returns [`PdfError::Io`] if the file cannot be read and
/// [`PdfError::Layout`] if it is not a valid layout.
pub fn load_layout_file(path: &Path) -> Result<DocumentLayout, PdfError> {
    let toml_str = std::fs::read_to_string(path)?;
    let layout = parse_layout_toml(&toml_str)?;
    log::debug!("Loaded {} layout from {}", layout.role(), path.display());
    Ok(layout)
}

/// Renders a layout as TOML, in the format [`parse_layout_toml`] reads.
///
/// # Errors
///
/// Returns [`PdfError::LayoutSerialize`] if the layout cannot be
/// represented as TOML.
pub fn render_layout(layout: &DocumentLayout) -> Result<String, PdfError> {
    Ok(toml::to_string(layout)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_layouts_match_their_role() {
        for &role in Role::all() {
            assert_eq!(default_layout(role).role(), role);
        }
    }

    #[test]
    fn senate_layout_defaults_drift() {
        let DocumentLayout::Senator(layout) = default_layout(Role::Senator) else {
            panic!("expected a senate layout");
        };
        assert_eq!(layout.column_drift, DEFAULT_COLUMN_DRIFT);
        assert_eq!(layout.email.label, "Email:");
        assert_eq!(layout.expected_records, Some(75));
    }

    #[test]
    fn representative_layout_lists_parties() {
        let DocumentLayout::Representative(layout) = default_layout(Role::Representative) else {
            panic!("expected a representatives layout");
        };
        assert_eq!(layout.phone.label, "Tel:");
        assert!(layout.parties.iter().any(|p| p == "ALP"));
    }

    #[test]
    fn rendered_layouts_parse_back() {
        for &role in Role::all() {
            let layout = default_layout(role);
            let rendered = render_layout(&layout).unwrap();
            assert!(rendered.contains(&format!("role = \"{role}\"")));
            assert_eq!(parse_layout_toml(&rendered).unwrap(), layout);
        }
    }

    #[test]
    fn loads_layout_files() {
        let path = std::env::temp_dir().join(format!(
            "parl_contacts_layout_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, render_layout(&default_layout(Role::Senator)).unwrap()).unwrap();

        let loaded = load_layout_file(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.unwrap(), default_layout(Role::Senator));
    }

    #[test]
    fn missing_layout_file_is_an_io_error() {
        let err = load_layout_file(Path::new("/nonexistent/layout.toml")).unwrap_err();
        assert!(matches!(err, PdfError::Io(_)));
    }

    #[test]
    fn rejects_unknown_role() {
        let err = parse_layout_toml("role = \"governor\"\n").unwrap_err();
        assert!(matches!(err, PdfError::Layout(_)));
    }

    #[test]
    fn custom_layout_overrides_columns() {
        let layout = parse_layout_toml(
            r#"
role = "senator"
column_drift = 3
state_min_column = 35
phone_column = 110

[email]
label = "E-mail:"
column = 70
"#,
        )
        .unwrap();

        let DocumentLayout::Senator(layout) = layout else {
            panic!("expected a senate layout");
        };
        assert_eq!(layout.column_drift, 3);
        assert_eq!(layout.phone_column, 110);
        assert_eq!(layout.expected_records, None);
    }
}
