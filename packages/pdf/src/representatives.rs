//! Field extraction for House of Representatives directory entries.
//!
//! An entry spans several physical lines. The name, electorate and
//! Parliament House phone usually share the first row, but the name may
//! sit on the row below the electorate, and given names often wrap onto a
//! row of their own:
//!
//! ```text
//! van Manen, Mr Albertus                 Forde,              LP        Tenancy 4/96 ...        Tel: (02) 6277 4719
//!                                        Qld                           Qld 4207                Fax: (02) 6277 8553
//! Johannes (Bert)
//!                                                                      E-mail: bert.vanmanen.mp@aph.gov.au
//! ```
//!
//! Each field is therefore matched independently over the whole block;
//! nothing depends on which row a field was printed on.

use parl_contacts_models::{ContactRecord, normalize_phone};
use regex::Regex;

use crate::PdfError;
use crate::classifier::SURNAME_PARTICLES;
use crate::layout::RepresentativeLayout;
use crate::lines::Block;

/// A member's name as printed across one or more lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MpName {
    /// Surname, including particles (`"van Manen"`).
    pub surname: String,
    /// Honorific and given names, with any wrapped continuation appended.
    pub given_names: String,
}

/// The fields that identify one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MpDetails {
    /// Parliament House phone number.
    pub phone: String,
    /// Surname as printed.
    pub surname: String,
    /// Electorate name.
    pub electorate: String,
}

/// Pattern matchers for one representatives layout.
#[derive(Debug, Clone)]
pub struct RepresentativeReader<'a> {
    layout: &'a RepresentativeLayout,
    /// Surname, comma, one space, then a capitalised honorific or given
    /// name, starting in the name column.
    surname_re: Regex,
    /// A capitalised place name followed by a comma and then a party
    /// abbreviation (or the end of the line when the row wrapped).
    electorate_re: Regex,
    /// A name-column line holding only capitalised words, with an
    /// optional bracketed preferred name.
    given_names_re: Regex,
}

impl<'a> RepresentativeReader<'a> {
    /// Compiles the patterns for `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Regex`] if the layout's party list produces an
    /// invalid pattern.
    pub fn new(layout: &'a RepresentativeLayout) -> Result<Self, PdfError> {
        let indent = layout.name_indent_max;

        let mut parties: Vec<String> = layout.parties.iter().map(|p| regex::escape(p)).collect();
        parties.sort_by_key(|party| std::cmp::Reverse(party.len()));

        let surname_re = Regex::new(&format!(
            r"^\s{{0,{indent}}}((?:(?:{particles}) )*[A-Z][A-Za-z'\-]*(?: [A-Z][A-Za-z'\-]*)?), ([A-Z][^\s,]*(?: [^\s,]+)*)",
            particles = SURNAME_PARTICLES.join("|"),
        ))?;

        let electorate_re = Regex::new(&format!(
            r"(?:^|\s\s)([A-Z][A-Za-z'\-]*(?:[ \-][A-Z][A-Za-z'\-]*){{0,2}}),(?:\s{{2,}}(?:{parties})\b|\s*$)",
            parties = parties.join("|"),
        ))?;

        let given_names_re = Regex::new(&format!(
            r"^\s{{0,{indent}}}([A-Z][A-Za-z'\-]*(?: \(?[A-Z][A-Za-z'\-]*\)?)*)\s*$"
        ))?;

        Ok(Self {
            layout,
            surname_re,
            electorate_re,
            given_names_re,
        })
    }

    /// The layout the patterns were compiled from.
    #[must_use]
    pub const fn layout(&self) -> &'a RepresentativeLayout {
        self.layout
    }

    /// Returns `true` if `line` opens a member's name (`Surname, Title ...`)
    /// in the name column.
    #[must_use]
    pub fn is_name_row(&self, line: &str) -> bool {
        self.surname_re.is_match(line)
    }

    /// Finds the member's name among `lines`.
    ///
    /// The first line matching the surname pattern supplies the surname;
    /// any name-only lines elsewhere in the window are wrapped given names
    /// and are appended in order.
    #[must_use]
    pub fn read_mp_name(&self, lines: &[&str]) -> Option<MpName> {
        let (name_row, caps) = lines
            .iter()
            .enumerate()
            .find_map(|(row, line)| self.surname_re.captures(line).map(|caps| (row, caps)))?;

        let mut given_names = caps[2].trim().to_owned();

        for (row, line) in lines.iter().enumerate() {
            if row == name_row {
                continue;
            }
            if let Some(continuation) = self.given_names_re.captures(line) {
                given_names.push(' ');
                given_names.push_str(continuation[1].trim());
            }
        }

        Some(MpName {
            surname: caps[1].trim().to_owned(),
            given_names,
        })
    }

    /// Finds the electorate among `lines`, independent of where the name
    /// was printed.
    #[must_use]
    pub fn read_electorate(&self, lines: &[&str]) -> Option<String> {
        lines.iter().find_map(|line| {
            self.electorate_re
                .captures(line)
                .map(|caps| caps[1].trim().to_owned())
        })
    }

    /// Reads the Parliament House phone number from the first line carrying
    /// the phone label.
    #[must_use]
    pub fn read_phone(&self, lines: &[&str]) -> Option<String> {
        let raw = self
            .layout
            .phone
            .read_first(lines.iter().copied(), self.layout.column_drift)?;
        normalize_phone(&raw)
    }

    /// Reads `(phone, surname, electorate)` from one member's lines.
    ///
    /// Returns `None` if any of the three cannot be located.
    #[must_use]
    pub fn read_mp_details(&self, lines: &[&str]) -> Option<MpDetails> {
        let phone = self.read_phone(lines)?;
        let name = self.read_mp_name(lines)?;
        let electorate = self.read_electorate(lines)?;

        Some(MpDetails {
            phone,
            surname: name.surname,
            electorate,
        })
    }

    /// Extracts a member's record from their block.
    #[must_use]
    pub fn extract(&self, block: &Block<'_>) -> Option<ContactRecord> {
        let texts = block.texts();
        let details = self.read_mp_details(&texts)?;
        let email = self
            .layout
            .email
            .read_first(texts.iter().copied(), self.layout.column_drift);

        Some(ContactRecord::representative(
            details.surname,
            details.phone,
            details.electorate,
            email,
        ))
    }
}
