//! Merge-by-key reconciliation of sources.
//!
//! The CSV listing is the base set. Fields from the web table and the PDF
//! directories are folded into the base rows that share a phone number;
//! legislators that only appear in a secondary source are not added.

use crate::keyed::KeyedRows;

/// Merges `source` into `base`.
///
/// For every key present in both, each field of the source row is written
/// into the base row, overwriting a field of the same name. Keys present
/// only in `source` are ignored.
///
/// Returns the number of base rows that were updated.
pub fn merge_into(base: &mut KeyedRows, source: &KeyedRows) -> usize {
    let mut matched = 0_usize;

    for (key, row) in &mut *base {
        let Some(update) = source.get(key) else {
            continue;
        };
        matched += 1;
        for (field, value) in update {
            row.insert(field.clone(), value.clone());
        }
    }

    let unmatched = source.len() - matched;
    if unmatched > 0 {
        log::debug!("{unmatched} source rows have no base row and were ignored");
    }

    matched
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::keyed::key_by_phone;

    fn keyed(rows: Vec<serde_json::Value>) -> KeyedRows {
        key_by_phone(rows, "phone")
    }

    #[test]
    fn source_fields_win_on_matching_keys() {
        let mut base = keyed(vec![
            json!({ "phone": "(02) 6277 7500", "surname": "BISHOP", "party": "LP" }),
        ]);
        let source = keyed(vec![
            json!({ "phone": "(02) 6277 7500", "surname": "Bishop", "email": "Julie.Bishop.MP@aph.gov.au" }),
        ]);

        assert_eq!(merge_into(&mut base, &source), 1);

        let row = &base["(02) 6277 7500"];
        assert_eq!(row["surname"], "Bishop");
        assert_eq!(row["party"], "LP");
        assert_eq!(row["email"], "Julie.Bishop.MP@aph.gov.au");
    }

    #[test]
    fn keys_only_in_source_are_ignored() {
        let mut base = keyed(vec![json!({ "phone": "(02) 6277 7700", "surname": "Abbott" })]);
        let source = keyed(vec![json!({ "phone": "(02) 6277 7500", "surname": "Bishop" })]);

        assert_eq!(merge_into(&mut base, &source), 0);
        assert_eq!(base.len(), 1);
        assert!(!base.contains_key("(02) 6277 7500"));
    }

    #[test]
    fn base_rows_without_a_match_are_untouched() {
        let mut base = keyed(vec![
            json!({ "phone": "(02) 6277 7700", "surname": "Abbott" }),
            json!({ "phone": "(02) 6277 4233", "surname": "Broadbent" }),
        ]);
        let source = keyed(vec![json!({ "phone": "(02) 6277 4233", "electorate": "McMillan" })]);

        merge_into(&mut base, &source);

        assert_eq!(base["(02) 6277 7700"].len(), 2);
        assert_eq!(base["(02) 6277 4233"]["electorate"], "McMillan");
    }
}
