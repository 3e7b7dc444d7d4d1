// 📊 Ordering Strategies - total orders over records
// Sort keys compare strings by code point, case-sensitive.
// That is deliberately NOT the case-insensitive comparison used for identity.

use crate::record::Record;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Female before Male, then last name ascending
    GenderThenLastName,
    /// Oldest first
    DateOfBirth,
    LastNameDescending,
    LastNameThenFirstName,
    ColorThenLastName,
}

impl SortOrder {
    pub const ALL: [SortOrder; 5] = [
        SortOrder::GenderThenLastName,
        SortOrder::DateOfBirth,
        SortOrder::LastNameDescending,
        SortOrder::LastNameThenFirstName,
        SortOrder::ColorThenLastName,
    ];

    /// Short name used in URLs and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            SortOrder::GenderThenLastName => "gender",
            SortOrder::DateOfBirth => "birthdate",
            SortOrder::LastNameDescending => "lastname_desc",
            SortOrder::LastNameThenFirstName => "name",
            SortOrder::ColorThenLastName => "color",
        }
    }

    /// Human-readable title for listings
    pub fn title(&self) -> &'static str {
        match self {
            SortOrder::GenderThenLastName => "Records sorted by Gender, then by Last Name, ascending",
            SortOrder::DateOfBirth => "Records sorted by Date of Birth, ascending",
            SortOrder::LastNameDescending => "Records sorted by Last Name, descending",
            SortOrder::LastNameThenFirstName => "Records sorted by Last Name, then by First Name, ascending",
            SortOrder::ColorThenLastName => "Records sorted by Favorite Color, then by Last Name, ascending",
        }
    }

    /// Case-insensitive lookup by [`name`](Self::name)
    pub fn from_name(name: &str) -> Option<SortOrder> {
        SortOrder::ALL
            .into_iter()
            .find(|order| order.name().eq_ignore_ascii_case(name))
    }

    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortOrder::GenderThenLastName => a
                .gender()
                .cmp(&b.gender())
                .then_with(|| a.last_name().cmp(b.last_name())),
            SortOrder::DateOfBirth => a.date_of_birth().cmp(&b.date_of_birth()),
            SortOrder::LastNameDescending => b.last_name().cmp(a.last_name()),
            SortOrder::LastNameThenFirstName => a
                .last_name()
                .cmp(b.last_name())
                .then_with(|| a.first_name().cmp(b.first_name())),
            SortOrder::ColorThenLastName => a
                .favorite_color()
                .cmp(b.favorite_color())
                .then_with(|| a.last_name().cmp(b.last_name())),
        }
    }
}
