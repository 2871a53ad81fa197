//! Field extraction for Senate directory entries.
//!
//! A senator's first row carries everything but the email:
//!
//! ```text
//! 1      Abetz, Senator the Hon Eric                   TAS         LP      Highbury House, 136 Davey Street,                 (03) 6224 3707
//!                                                                          Email: senator.abetz@aph.gov.au
//! ```
//!
//! The state column starts at different offsets between editions and long
//! names push it right, so the state is found by scanning for a
//! jurisdiction code rather than by slicing a fixed column.

use std::str::FromStr as _;
use std::sync::LazyLock;

use parl_contacts_models::{ContactRecord, Jurisdiction, normalize_phone};
use regex::Regex;

use crate::classifier::senator_lead;
use crate::layout::SenateLayout;
use crate::lines::{Block, byte_offset};

/// A jurisdiction code as a whole word, optionally glued to a party
/// abbreviation (`TASLP`).
static STATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let mut codes: Vec<&str> = Jurisdiction::all().iter().map(AsRef::as_ref).collect();
    codes.sort_by_key(|code| std::cmp::Reverse(code.len()));
    Regex::new(&format!(r"\b({})(?:[A-Z]{{2,4}})?\b", codes.join("|"))).expect("valid regex")
});

/// An Australian phone number with area code.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(0\d\)\s?\d{4}\s?\d{4}").expect("valid regex"));

/// A `(fax)` annotation directly after a number.
static FAX_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*\(fax\)").expect("valid regex"));

/// Reads the jurisdiction and surname from a senator's first line.
///
/// Returns `None` if the line does not open a senator entry or carries no
/// jurisdiction code right of the name.
#[must_use]
pub fn read_senator_state_and_surname(
    line: &str,
    layout: &SenateLayout,
) -> Option<(Jurisdiction, String)> {
    let lead = senator_lead(line)?;
    let search_from = byte_offset(line, layout.state_min_column).max(lead.name_end);

    let caps = STATE_RE.captures_at(line, search_from)?;
    let state = Jurisdiction::from_str(caps.get(1)?.as_str()).ok()?;

    Some((state, lead.surname.to_owned()))
}

/// Reads the electorate office phone number from a senator's lines.
///
/// Takes the first number at or right of the layout's phone column that is
/// not annotated as a fax.
#[must_use]
pub fn read_senator_phone<'a>(
    lines: impl IntoIterator<Item = &'a str>,
    layout: &SenateLayout,
) -> Option<String> {
    let column = layout.phone_column.saturating_sub(layout.column_drift);

    lines.into_iter().find_map(|line| {
        let rest = &line[byte_offset(line, column)..];
        PHONE_RE
            .find_iter(rest)
            .find(|number| !FAX_SUFFIX_RE.is_match(&rest[number.end()..]))
            .and_then(|number| normalize_phone(number.as_str()))
    })
}

/// Extracts a senator's record from their block.
///
/// Returns `None` when the surname, state or phone cannot be found.
#[must_use]
pub fn extract_senator(block: &Block<'_>, layout: &SenateLayout) -> Option<ContactRecord> {
    let texts = block.texts();

    let (state, surname) = read_senator_state_and_surname(block.first().text, layout)?;
    let phone = read_senator_phone(texts.iter().copied(), layout)?;
    let email = layout
        .email
        .read_first(texts.iter().copied(), layout.column_drift);

    Some(ContactRecord::senator(surname, phone, state, email))
}

#[cfg(test)]
mod tests {
    use parl_contacts_models::Role;

    use super::*;
    use crate::layout::{DocumentLayout, default_layout};
    use crate::lines::document_lines;

    fn layout() -> SenateLayout {
        let DocumentLayout::Senator(layout) = default_layout(Role::Senator) else {
            panic!("expected a senate layout");
        };
        layout
    }

    fn state_and_surname(line: &str) -> Option<(Jurisdiction, String)> {
        read_senator_state_and_surname(line, &layout())
    }

    #[test]
    fn reads_state_and_surname() {
        let line = "2      Back, Senator Christopher John (Chris)        WA          LP      Unit E5, 817 Beeliar Drive,                       (08) 9414 7288";
        assert_eq!(
            state_and_surname(line),
            Some((Jurisdiction::Wa, "Back".to_owned()))
        );
    }

    #[test]
    fn reads_senators_titled_the_hon() {
        let line = "1      Abetz, Senator the Hon Eric                   TAS         LP      Highbury House, 136 Davey Street,                 (03) 6224 3707";
        assert_eq!(
            state_and_surname(line),
            Some((Jurisdiction::Tas, "Abetz".to_owned()))
        );
    }

    #[test]
    fn handles_extra_long_name_columns() {
        let line = "24     Fifield, Senator the Hon Mitchell Peter (Mitch) VIC         LP      42 Florence Street, Mentone VIC 3194               (03) 9584 2455";
        assert_eq!(
            state_and_surname(line),
            Some((Jurisdiction::Vic, "Fifield".to_owned()))
        );
    }

    #[test]
    fn handles_state_starting_in_a_different_column() {
        let line = "73     Williams, Senator John Reginald              NSW        NATS      144 Byron Street, Inverell NSW 2360              (02) 6721 4500";
        assert_eq!(
            state_and_surname(line),
            Some((Jurisdiction::Nsw, "Williams".to_owned()))
        );
    }

    #[test]
    fn ignores_star_decoration() {
        let plain = "34     Lindgren, Senator JoannaMaria                 QLD         LP       2166 Logan Road, Upper Mount Gravatt QLD 4122    (07) 3422 1990 ";
        let starred = "**34   Lindgren, Senator JoannaMaria                 QLD         LP       2166 Logan Road, Upper Mount Gravatt QLD 4122    (07) 3422 1990 ";
        assert_eq!(state_and_surname(plain), state_and_surname(starred));
        assert_eq!(
            state_and_surname(starred),
            Some((Jurisdiction::Qld, "Lindgren".to_owned()))
        );
    }

    #[test]
    fn accepts_party_glued_to_state() {
        let line = "5      Bishop, Senator Thomas Mark                   TASALP   Shop 2, 1 Main Road,                               (03) 6200 0000";
        assert_eq!(
            state_and_surname(line),
            Some((Jurisdiction::Tas, "Bishop".to_owned()))
        );
    }

    #[test]
    fn rejects_line_without_state() {
        let line = "9      Nobody, Senator Vacant";
        assert!(state_and_surname(line).is_none());
    }

    #[test]
    fn phone_skips_fax_numbers() {
        let lines = [
            "6      Bushby, Senator David Christopher             TAS         LP      Level 2, 39 Sandy Bay Road,",
            "                                                                         Email: senator.bushby@aph.gov.au                  (03) 6244 8521 (fax)",
            "                                                                                                                           (03) 6224 8520",
        ];
        assert_eq!(
            read_senator_phone(lines, &layout()).as_deref(),
            Some("(03) 6224 8520")
        );
    }

    #[test]
    fn extracts_full_senator_record() {
        let text = "\
1      Abetz, Senator the Hon Eric                   TAS         LP      Highbury House, 136 Davey Street,                 (03) 6224 3707
         Minister Assisting the Prime Ministerfor the                    Email: senator.abetz@aph.gov.au";
        let lines = document_lines(text);
        let mut block = Block::starting_at(lines[0]);
        block.push(lines[1]);

        let record = extract_senator(&block, &layout()).unwrap();

        assert_eq!(
            record,
            ContactRecord::senator(
                "Abetz",
                "(03) 6224 3707",
                Jurisdiction::Tas,
                Some("senator.abetz@aph.gov.au".to_owned()),
            )
        );
    }

    #[test]
    fn missing_phone_drops_the_senator() {
        let lines = document_lines(
            "1      Abetz, Senator the Hon Eric                   TAS         LP      Highbury House, 136 Davey Street,",
        );
        let block = Block::starting_at(lines[0]);
        assert!(extract_senator(&block, &layout()).is_none());
    }
}
