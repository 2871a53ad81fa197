#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Legislator roles, jurisdictions and the canonical contact record.
//!
//! Every source (the parliamentary PDF directories, the CSV listing and
//! the web table) is reduced to records keyed by phone number, which is
//! the join key used when the sources are merged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which chamber a legislator sits in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// Member of the House of Representatives
    Representative,
    /// Member of the Senate
    Senator,
}

impl Role {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Representative, Self::Senator]
    }
}

/// State or territory a senator is elected for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Jurisdiction {
    /// New South Wales
    Nsw,
    /// Victoria
    Vic,
    /// Queensland
    Qld,
    /// Western Australia
    Wa,
    /// South Australia
    Sa,
    /// Tasmania
    Tas,
    /// Australian Capital Territory
    Act,
    /// Northern Territory
    Nt,
}

impl Jurisdiction {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Nsw,
            Self::Vic,
            Self::Qld,
            Self::Wa,
            Self::Sa,
            Self::Tas,
            Self::Act,
            Self::Nt,
        ]
    }
}

/// The role-specific locator of a legislator.
///
/// Serialized flattened into the record, so a representative carries an
/// `"electorate"` key and a senator a `"state"` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    /// Electorate name (e.g. `"Curtin"`).
    Electorate(String),
    /// Jurisdiction code (e.g. `TAS`).
    State(Jurisdiction),
}

/// A legislator's contact details as recovered from a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Family name as printed (e.g. `"van Manen"`).
    pub surname: String,
    /// Phone number, the join key (e.g. `"(02) 6277 7500"`).
    pub phone: String,
    /// Email address, when the directory lists one.
    pub email: Option<String>,
    /// Chamber the legislator sits in.
    pub role: Role,
    /// Electorate or state.
    #[serde(flatten)]
    pub seat: Seat,
}

impl ContactRecord {
    /// Creates a record for a member of the House of Representatives.
    #[must_use]
    pub fn representative(
        surname: impl Into<String>,
        phone: impl Into<String>,
        electorate: impl Into<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            surname: surname.into(),
            phone: phone.into(),
            email,
            role: Role::Representative,
            seat: Seat::Electorate(electorate.into()),
        }
    }

    /// Creates a record for a senator.
    #[must_use]
    pub fn senator(
        surname: impl Into<String>,
        phone: impl Into<String>,
        state: Jurisdiction,
        email: Option<String>,
    ) -> Self {
        Self {
            surname: surname.into(),
            phone: phone.into(),
            email,
            role: Role::Senator,
            seat: Seat::State(state),
        }
    }

    /// Returns the electorate, if this is a representative.
    #[must_use]
    pub fn electorate(&self) -> Option<&str> {
        match &self.seat {
            Seat::Electorate(name) => Some(name),
            Seat::State(_) => None,
        }
    }

    /// Returns the jurisdiction, if this is a senator.
    #[must_use]
    pub const fn state(&self) -> Option<Jurisdiction> {
        match self.seat {
            Seat::State(state) => Some(state),
            Seat::Electorate(_) => None,
        }
    }
}

/// Records of one document keyed by phone number.
///
/// Ordered by key so repeated extractions serialize identically.
pub type RecordMap = BTreeMap<String, ContactRecord>;

/// Normalizes an Australian phone number to the `(0N) NNNN NNNN` form
/// used as the join key.
///
/// Returns `None` unless the input holds exactly ten digits starting with
/// a trunk `0`; punctuation and spacing are ignored.
#[must_use]
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 10 || !digits.starts_with('0') {
        return None;
    }

    Some(format!(
        "({}) {} {}",
        &digits[..2],
        &digits[2..6],
        &digits[6..]
    ))
}
