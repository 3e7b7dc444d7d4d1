// 👤 Record Entity - One validated person entry
// Identity = (last name, first name, gender, date of birth), names compared case-insensitively.
// Favorite color and sequence id are values, never identity.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

/// Display format for dates (`2/10/1990`)
pub const DISPLAY_DATE_FORMAT: &str = "%-m/%-d/%Y";

// ============================================================================
// GENDER
// ============================================================================

/// Declared order matters: sorted views put `Female` before `Male`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn name(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// SEQUENCE GENERATOR
// ============================================================================

/// Hands out display ids for new records.
///
/// Owned by whoever constructs records (normally a [`LineParser`](crate::LineParser)),
/// so two independent parsers never share or race on a counter.
#[derive(Debug)]
pub struct SequenceGenerator {
    next: AtomicU64,
}

impl SequenceGenerator {
    /// Start counting at 1
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        SequenceGenerator {
            next: AtomicU64::new(first),
        }
    }

    /// Take the next id. Never returns the same value twice.
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// The id the next call to `next_id` will return
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// IDENTITY KEY
// ============================================================================

/// The four identity fields, names upper-cased.
///
/// `RecordCollection` keys its map with this, so two records land in the same
/// slot exactly when `Record::eq` says they are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    last_name: String,
    first_name: String,
    gender: Gender,
    date_of_birth: NaiveDate,
}

// ============================================================================
// RECORD
// ============================================================================

/// Immutable person record.
///
/// Fields are private: once built, nothing can change them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    id: u64,
    last_name: String,
    first_name: String,
    gender: Gender,
    favorite_color: String,
    date_of_birth: NaiveDate,
}

impl Record {
    /// Build a record from already-validated fields and assign the next sequence id.
    pub fn new(
        sequence: &SequenceGenerator,
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        gender: Gender,
        favorite_color: impl Into<String>,
        date_of_birth: NaiveDate,
    ) -> Self {
        Record {
            id: sequence.next_id(),
            last_name: last_name.into(),
            first_name: first_name.into(),
            gender,
            favorite_color: favorite_color.into(),
            date_of_birth,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn favorite_color(&self) -> &str {
        &self.favorite_color
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    /// Derive the deduplication key
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            last_name: self.last_name.to_uppercase(),
            first_name: self.first_name.to_uppercase(),
            gender: self.gender,
            date_of_birth: self.date_of_birth,
        }
    }

    /// Canonical five-field comma form, accepted back by the line parser.
    ///
    /// Example: `Doe, John, Male, Blue, 2/10/1990`
    pub fn to_line(&self) -> String {
        format!(
            "{}, {}, {}, {}, {}",
            self.last_name,
            self.first_name,
            self.gender,
            self.favorite_color,
            self.date_of_birth.format(DISPLAY_DATE_FORMAT)
        )
    }
}

/// Case-insensitive name comparison, using the same upper-casing as `identity_key`
fn same_name(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_uppercase)
        .eq(b.chars().flat_map(char::to_uppercase))
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        same_name(&self.last_name, &other.last_name)
            && same_name(&self.first_name, &other.first_name)
            && self.gender == other.gender
            && self.date_of_birth == other.date_of_birth
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity_key().hash(state);
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.id, self.to_line())
    }
}

// ============================================================================
// TESTS
// ============================================================================
