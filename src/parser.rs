// 🏗️ Line Parser - free-form text line → validated Record
// Delimiters: comma, pipe, whitespace runs. Mixed freely within a line.

use crate::error::ParseError;
use crate::record::{Gender, Record, SequenceGenerator};
use chrono::NaiveDate;

/// Every line must carry exactly this many fields
pub const FIELD_COUNT: usize = 5;

/// Two-digit years roll over at this year: `29` → 2029, `30` → 1930.
pub const TWO_DIGIT_YEAR_MAX: i32 = 2029;

// ============================================================================
// TOKENIZER
// ============================================================================

fn is_delimiter(c: char) -> bool {
    c == ',' || c == '|' || c.is_whitespace()
}

/// Split a line into non-empty fields.
///
/// Adjacent, leading and trailing delimiters never produce empty fields, so
/// `"Doe | John"` and `"Doe,John"` both give `["Doe", "John"]`.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split(is_delimiter).filter(|t| !t.is_empty()).collect()
}

// ============================================================================
// FIELD PARSERS
// ============================================================================

/// `female`/`f` and `male`/`m`, any case
pub fn parse_gender(token: &str) -> Result<Gender, ParseError> {
    if token.eq_ignore_ascii_case("female") || token.eq_ignore_ascii_case("f") {
        Ok(Gender::Female)
    } else if token.eq_ignore_ascii_case("male") || token.eq_ignore_ascii_case("m") {
        Ok(Gender::Male)
    } else {
        Err(ParseError::InvalidGender(token.to_string()))
    }
}

/// Parse a date of birth.
///
/// Accepted shapes:
/// - `M/d/yyyy` and zero-padded `MM/dd/yyyy`
/// - `M/d/yy` (two-digit years expand through [`TWO_DIGIT_YEAR_MAX`])
/// - ISO `yyyy-MM-dd`
///
/// Month always comes first: `22/10/90` is rejected, not read as 22 October.
pub fn parse_date(token: &str) -> Result<NaiveDate, ParseError> {
    let invalid = || ParseError::InvalidDate(token.to_string());

    if token.contains('-') {
        let parts: Vec<&str> = token.split('-').collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(invalid());
        };
        // ISO years are always written in full
        if year.len() != 4 {
            return Err(invalid());
        }
        let year = digits(year, 4).ok_or_else(invalid)? as i32;
        let month = digits(month, 2).ok_or_else(invalid)?;
        let day = digits(day, 2).ok_or_else(invalid)?;
        return NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid);
    }

    let parts: Vec<&str> = token.split('/').collect();
    let [month, day, year] = parts.as_slice() else {
        return Err(invalid());
    };

    let month = digits(month, 2).ok_or_else(invalid)?;
    let day = digits(day, 2).ok_or_else(invalid)?;
    let year = match year.len() {
        1 | 2 => expand_two_digit_year(digits(year, 2).ok_or_else(invalid)?),
        4 => digits(year, 4).ok_or_else(invalid)? as i32,
        _ => return Err(invalid()),
    };

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// ASCII digits only, 1..=max_len of them
fn digits(part: &str, max_len: usize) -> Option<u32> {
    if part.is_empty() || part.len() > max_len || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn expand_two_digit_year(yy: u32) -> i32 {
    let year = (TWO_DIGIT_YEAR_MAX / 100) * 100 + yy as i32;
    if year > TWO_DIGIT_YEAR_MAX {
        year - 100
    } else {
        year
    }
}

// ============================================================================
// LINE PARSER
// ============================================================================

/// Turns lines into records.
///
/// Owns the sequence generator, so every record it produces gets a fresh id.
/// Ids are only consumed by lines that parse successfully.
#[derive(Debug, Default)]
pub struct LineParser {
    sequence: SequenceGenerator,
}

impl LineParser {
    pub fn new() -> Self {
        LineParser {
            sequence: SequenceGenerator::new(),
        }
    }

    pub fn with_sequence(sequence: SequenceGenerator) -> Self {
        LineParser { sequence }
    }

    pub fn sequence(&self) -> &SequenceGenerator {
        &self.sequence
    }

    /// Parse one line into a record, or say why it can't be one.
    ///
    /// Field order is fixed: last name, first name, gender, favorite color, date of birth.
    pub fn parse_line(&self, line: &str) -> Result<Record, ParseError> {
        if line.trim().is_empty() {
            return Err(ParseError::BlankInput);
        }

        let fields = tokenize(line);
        let [last_name, first_name, gender, color, birth] = fields.as_slice() else {
            return Err(ParseError::FieldCountMismatch {
                expected: FIELD_COUNT,
                actual: fields.len(),
            });
        };

        let gender = parse_gender(gender)?;
        let date_of_birth = parse_date(birth)?;

        Ok(Record::new(
            &self.sequence,
            *last_name,
            *first_name,
            gender,
            *color,
            date_of_birth,
        ))
    }
}

// ============================================================================
// TESTS
// ============================================================================
