//! Record-boundary detection.
//!
//! Senate entries open with a running index number followed by the
//! surname and a comma (`4      Bilyk, Senator Catryna Louise`). Casual
//! vacancy appointees carry a `*` or `**` decoration before the index.
//! Page footers (`44 Parliament ... as at 21 May 2015`) and numbered
//! footnotes also begin with digits, but never with a comma-terminated
//! name right after the number.

use std::sync::LazyLock;

use parl_contacts_models::Role;
use regex::Regex;

/// Lower-case particles allowed inside a surname (`van Manen`, `Van der
/// Berg`). Any other surname word must be capitalised.
pub const SURNAME_PARTICLES: &[&str] = &["van", "von", "de", "der", "den", "di", "da", "du", "la", "le"];

/// Optional stars, the index, whitespace, then a surname of up to three
/// words ending in a comma.
static SENATOR_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^\s*\**\s*(\d+)\s+([A-Z][A-Za-z'\-]*(?: (?:[A-Z][A-Za-z'\-]*|{particles})){{0,2}}),",
        particles = SURNAME_PARTICLES.join("|"),
    ))
    .expect("valid regex")
});

/// The leading index and surname of a senator's first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SenatorLead<'a> {
    /// Running number printed in the directory.
    pub index: usize,
    /// Surname as printed, up to the comma.
    pub surname: &'a str,
    /// Byte offset just past the surname's comma.
    pub name_end: usize,
}

/// Splits the index number and surname off a senator's first line.
///
/// Returns `None` for lines that do not open a senator entry.
#[must_use]
pub fn senator_lead(line: &str) -> Option<SenatorLead<'_>> {
    let caps = SENATOR_START_RE.captures(line)?;
    let index = caps[1].parse().ok()?;
    let surname = caps.get(2)?;

    Some(SenatorLead {
        index,
        surname: surname.as_str().trim(),
        name_end: caps.get(0)?.end(),
    })
}

/// Returns `true` if `line` opens a new record in a `role` directory.
///
/// Representative entries have no single-line marker; they are grouped
/// on their phone line instead (see
/// [`crate::blocks::assemble_representative_blocks`]), so this always
/// answers `false` for [`Role::Representative`].
#[must_use]
pub fn is_new_record_start(line: &str, role: Role) -> bool {
    match role {
        Role::Senator => SENATOR_START_RE.is_match(line),
        Role::Representative => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_senator_line() {
        let line = "4      Bilyk, Senator CatrynaLouise                  TAS        ALP      Suite 3, Kingston Plaza, 20 Channel Highway,      (03) 6229 4444 ";
        assert!(is_new_record_start(line, Role::Senator));
    }

    #[test]
    fn accepts_starred_senator_line() {
        let line = "**34   Lindgren, Senator JoannaMaria                 QLD         LP       2166 Logan Road, Upper Mount Gravatt QLD 4122    (07) 3422 1990 ";
        assert!(is_new_record_start(line, Role::Senator));
    }

    #[test]
    fn rejects_page_footer() {
        let line = " 44 Parliament                                                                                                             as at 21 May 2015 ";
        assert!(!is_new_record_start(line, Role::Senator));
    }

    #[test]
    fn rejects_vacancy_footnote() {
        let line = "3    Chosen by the Australian Capital Territory Legislative Assemblya casual vacancy(vice K. Lundy), pursuant to section 15 of the Constitution.  ";
        assert!(!is_new_record_start(line, Role::Senator));
    }

    #[test]
    fn accepts_multi_word_and_hyphenated_surnames() {
        assert!(is_new_record_start(
            "12     Di Natale, Senator Richard                    VIC        AG",
            Role::Senator
        ));
        assert!(is_new_record_start(
            "30     Hanson-Young, Senator Sarah Coral             SA         AG",
            Role::Senator
        ));
    }

    #[test]
    fn rejects_numbered_footnote_with_lowercase_words() {
        let line = "2    Appointed by Parliament, pursuant to section 15 of the Constitution, to fill a casual vacancy.";
        assert!(!is_new_record_start(line, Role::Senator));
    }

    #[test]
    fn accepts_lowercase_surname_particles() {
        let lead = senator_lead("17     Van der Berg, Senator Anna                    WA          LP").unwrap();
        assert_eq!(lead.surname, "Van der Berg");
    }

    #[test]
    fn never_fires_for_representatives() {
        let line = "4      Bilyk, Senator CatrynaLouise                  TAS        ALP";
        assert!(!is_new_record_start(line, Role::Representative));
    }

    #[test]
    fn lead_strips_stars_and_index() {
        let lead = senator_lead("**34   Lindgren, Senator JoannaMaria").unwrap();
        assert_eq!(lead.index, 34);
        assert_eq!(lead.surname, "Lindgren");
        assert_eq!(&"**34   Lindgren, Senator JoannaMaria"[lead.name_end..], " Senator JoannaMaria");
    }
}
