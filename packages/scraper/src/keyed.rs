//! Phone-keyed views over scraped rows.
//!
//! Every source is joined on the legislator's phone number. Rows are
//! keyed by the value of their phone column, normalised to the
//! `(0N) NNNN NNNN` form when it holds a full ten-digit number so that
//! `02 6277 7500` and `(02) 6277 7500` meet.

use std::collections::BTreeMap;

use parl_contacts_models::normalize_phone;

/// One row's fields.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Rows of one source keyed by phone number.
pub type KeyedRows = BTreeMap<String, Row>;

/// Returns the join key for a raw phone value.
///
/// Falls back to the trimmed input when it is not a ten-digit number, and
/// to `None` when it is blank.
#[must_use]
pub fn phone_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(normalize_phone(trimmed).unwrap_or_else(|| trimmed.to_owned()))
}

/// Keys `rows` by the phone number in `column`.
///
/// Rows that are not objects, or whose phone column is missing or blank,
/// are skipped. When two rows share a phone number the first is kept.
#[must_use]
pub fn key_by_phone(rows: Vec<serde_json::Value>, column: &str) -> KeyedRows {
    let mut keyed = KeyedRows::new();
    let mut skipped = 0_usize;

    for row in rows {
        let serde_json::Value::Object(row) = row else {
            skipped += 1;
            continue;
        };

        let Some(key) = row
            .get(column)
            .and_then(serde_json::Value::as_str)
            .and_then(phone_key)
        else {
            skipped += 1;
            continue;
        };

        if keyed.contains_key(&key) {
            log::warn!("Duplicate phone {key} in column '{column}', keeping the first row");
            continue;
        }

        keyed.insert(key, row);
    }

    if skipped > 0 {
        log::debug!("Skipped {skipped} rows without a '{column}' value");
    }

    keyed
}
