// 🔍 Record Collection - deduplicating aggregate of records
// Keyed by IdentityKey: inserting an identity-equal record replaces the stored one.
// Iteration follows first-insertion order; a replacement keeps its slot.

use crate::error::{ParseError, SourceError};
use crate::ordering::SortOrder;
use crate::parser::LineParser;
use crate::record::{IdentityKey, Record};
use crate::source::LineSource;
use indexmap::IndexMap;
use log::{info, warn};
use serde::Serialize;
use std::io::{BufRead, ErrorKind};

// ============================================================================
// INGEST REPORT
// ============================================================================

/// A line that was skipped during ingestion
#[derive(Debug, Clone, Serialize)]
pub struct RejectedLine {
    pub source: String,
    /// 1-based
    pub line: usize,
    #[serde(serialize_with = "serialize_display")]
    pub error: ParseError,
}

/// A source that was skipped entirely, or cut short by a read error
#[derive(Debug, Clone, Serialize)]
pub struct UnavailableSource {
    pub source: String,
    pub message: String,
}

/// What happened during one `ingest` call
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub accepted: usize,
    pub rejected: Vec<RejectedLine>,
    /// Lines skipped because they were not valid UTF-8
    pub undecodable: Vec<UndecodableLine>,
    pub unavailable: Vec<UnavailableSource>,
}

/// A line whose bytes could not be read as text
#[derive(Debug, Clone, Serialize)]
pub struct UndecodableLine {
    pub source: String,
    /// 1-based
    pub line: usize,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.rejected_count() == 0 && self.unavailable.is_empty()
    }

    /// Parse failures plus undecodable lines
    pub fn rejected_count(&self) -> usize {
        self.rejected.len() + self.undecodable.len()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} accepted, {} rejected, {} unavailable sources",
            self.accepted,
            self.rejected_count(),
            self.unavailable.len()
        )
    }
}

fn serialize_display<S: serde::Serializer>(err: &ParseError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(err)
}

// ============================================================================
// RECORD COLLECTION
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct RecordCollection {
    records: IndexMap<IdentityKey, Record>,
}

impl RecordCollection {
    pub fn new() -> Self {
        RecordCollection {
            records: IndexMap::new(),
        }
    }

    /// Build a collection from every line that parses, skipping bad lines and
    /// unavailable sources. Skips are logged; use [`ingest`](Self::ingest) to
    /// get them back as a report.
    pub fn create_from_sources(sources: &[Box<dyn LineSource>], parser: &LineParser) -> Self {
        let mut collection = RecordCollection::new();
        let report = collection.ingest(sources, parser);
        info!("Loaded {} distinct records ({})", collection.len(), report.summary());
        collection
    }

    /// Read each source to completion, in order, adding every parsed record.
    ///
    /// Never fails: problems end up in the returned report.
    pub fn ingest(&mut self, sources: &[Box<dyn LineSource>], parser: &LineParser) -> IngestReport {
        let mut report = IngestReport::default();

        for source in sources {
            match source.open() {
                Ok(reader) => self.ingest_reader(source.name(), reader, parser, &mut report),
                Err(SourceError::Unavailable { name, source: cause }) => {
                    warn!("Skipping source {}: {}", name, cause);
                    report.unavailable.push(UnavailableSource {
                        source: name,
                        message: cause.to_string(),
                    });
                }
            }
        }

        report
    }

    fn ingest_reader(
        &mut self,
        name: &str,
        reader: Box<dyn BufRead + '_>,
        parser: &LineParser,
        report: &mut IngestReport,
    ) {
        let mut accepted = 0;
        let mut rejected = 0;

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = match line {
                Ok(line) => line,
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    warn!("Skipping undecodable line {} in {}: {}", line_number, name, e);
                    rejected += 1;
                    report.undecodable.push(UndecodableLine {
                        source: name.to_string(),
                        line: line_number,
                    });
                    continue;
                }
                Err(e) => {
                    warn!("Read error at line {} in {}, stopping: {}", line_number, name, e);
                    report.unavailable.push(UnavailableSource {
                        source: name.to_string(),
                        message: e.to_string(),
                    });
                    break;
                }
            };

            match parser.parse_line(&line) {
                Ok(record) => {
                    self.add(record);
                    accepted += 1;
                }
                Err(error) => {
                    warn!("{} in input source {} (line {})", error, name, line_number);
                    rejected += 1;
                    report.rejected.push(RejectedLine {
                        source: name.to_string(),
                        line: line_number,
                        error,
                    });
                }
            }
        }

        info!("{}: {} lines accepted, {} rejected", name, accepted, rejected);
        report.accepted += accepted;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Insert, replacing any identity-equal record. Returns the replaced one.
    pub fn add(&mut self, record: Record) -> Option<Record> {
        self.records.insert(record.identity_key(), record)
    }

    pub fn remove(&mut self, record: &Record) -> Option<Record> {
        self.records.shift_remove(&record.identity_key())
    }

    pub fn contains(&self, record: &Record) -> bool {
        self.records.contains_key(&record.identity_key())
    }

    /// The stored record identity-equal to `record`
    pub fn get(&self, record: &Record) -> Option<&Record> {
        self.records.get(&record.identity_key())
    }

    // ========================================================================
    // SORTED VIEWS
    // ========================================================================

    /// Fresh sorted snapshot of the current records. The sort is stable, so
    /// ties keep collection order.
    pub fn sorted(&self, order: SortOrder) -> Vec<&Record> {
        let mut view: Vec<&Record> = self.records.values().collect();
        view.sort_by(|a, b| order.compare(a, b));
        view
    }

    pub fn sort_by_gender_then_last_name(&self) -> Vec<&Record> {
        self.sorted(SortOrder::GenderThenLastName)
    }

    pub fn sort_by_date_of_birth(&self) -> Vec<&Record> {
        self.sorted(SortOrder::DateOfBirth)
    }

    pub fn sort_by_last_name_descending(&self) -> Vec<&Record> {
        self.sorted(SortOrder::LastNameDescending)
    }

    pub fn sort_by_last_name_then_first_name(&self) -> Vec<&Record> {
        self.sorted(SortOrder::LastNameThenFirstName)
    }

    pub fn sort_by_color_then_last_name(&self) -> Vec<&Record> {
        self.sorted(SortOrder::ColorThenLastName)
    }
}

impl FromIterator<Record> for RecordCollection {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut collection = RecordCollection::new();
        collection.extend(iter);
        collection
    }
}

impl Extend<Record> for RecordCollection {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, iter: I) {
        for record in iter {
            self.add(record);
        }
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a Record;
    type IntoIter = indexmap::map::Values<'a, IdentityKey, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.values()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Gender, SequenceGenerator};
    use crate::source::{FileSource, TextSource};
    use chrono::NaiveDate;

    fn record(seq: &SequenceGenerator, last: &str, first: &str, gender: Gender, color: &str, dob: (i32, u32, u32)) -> Record {
        let dob = NaiveDate::from_ymd_opt(dob.0, dob.1, dob.2).unwrap();
        Record::new(seq, last, first, gender, color, dob)
    }

    fn names(view: &[&Record]) -> Vec<String> {
        view.iter()
            .map(|r| format!("{} {} {}", r.last_name(), r.first_name(), r.date_of_birth()))
            .collect()
    }

    /// Same data set as the sorting fixture: one color-only duplicate, one
    /// same-name-different-birthday record.
    fn sample(seq: &SequenceGenerator) -> RecordCollection {
        vec![
            record(seq, "Doe", "John", Gender::Male, "Blue", (1990, 2, 10)),
            record(seq, "Young", "Emily", Gender::Female, "Green", (1978, 9, 2)),
            record(seq, "Brown", "Amy", Gender::Female, "Red", (1995, 3, 13)),
            record(seq, "Craig", "Alex", Gender::Male, "Purple", (2001, 2, 10)),
            record(seq, "Brown", "Amy", Gender::Female, "Orange", (1995, 3, 13)),
            record(seq, "Brown", "Amy", Gender::Female, "Red", (1999, 6, 20)),
            record(seq, "Brown", "Debbie", Gender::Female, "White", (1999, 8, 31)),
        ]
        .into_iter()
        .collect()
    }

    fn sources(list: Vec<TextSource>) -> Vec<Box<dyn LineSource>> {
        list.into_iter()
            .map(|s| Box::new(s) as Box<dyn LineSource>)
            .collect()
    }

    #[test]
    fn test_duplicates_collapse() {
        let seq = SequenceGenerator::new();
        let collection = sample(&seq);
        assert_eq!(collection.len(), 6);
    }

    #[test]
    fn test_add_replaces_non_identity_fields() {
        let seq = SequenceGenerator::new();
        let mut collection = RecordCollection::new();
        let red = record(&seq, "Brown", "Amy", Gender::Female, "Red", (1995, 3, 13));
        let orange = record(&seq, "BROWN", "amy", Gender::Female, "Orange", (1995, 3, 13));

        assert!(collection.add(red).is_none());
        let replaced = collection.add(orange.clone());

        assert_eq!(replaced.map(|r| r.favorite_color().to_string()), Some("Red".to_string()));
        assert_eq!(collection.len(), 1);
        let stored = collection.get(&orange).unwrap();
        assert_eq!(stored.favorite_color(), "Orange");
        assert_eq!(stored.last_name(), "BROWN");
    }

    #[test]
    fn test_replacement_keeps_position() {
        let seq = SequenceGenerator::new();
        let mut collection = sample(&seq);
        collection.add(record(&seq, "Doe", "John", Gender::Male, "Black", (1990, 2, 10)));

        let first = collection.iter().next().unwrap();
        assert_eq!(first.last_name(), "Doe");
        assert_eq!(first.favorite_color(), "Black");
    }

    #[test]
    fn test_remove_and_contains() {
        let seq = SequenceGenerator::new();
        let mut collection = sample(&seq);
        let probe = record(&seq, "doe", "JOHN", Gender::Male, "Any", (1990, 2, 10));

        assert!(collection.contains(&probe));
        let removed = collection.remove(&probe).unwrap();
        assert_eq!(removed.favorite_color(), "Blue");
        assert!(!collection.contains(&probe));
        assert!(collection.remove(&probe).is_none());
        assert_eq!(collection.len(), 5);
    }

    #[test]
    fn test_sort_by_gender_then_last_name() {
        let seq = SequenceGenerator::new();
        let collection = sample(&seq);
        let view = collection.sort_by_gender_then_last_name();

        assert_eq!(
            names(&view),
            vec![
                "Brown Amy 1995-03-13",
                "Brown Amy 1999-06-20",
                "Brown Debbie 1999-08-31",
                "Young Emily 1978-09-02",
                "Craig Alex 2001-02-10",
                "Doe John 1990-02-10",
            ]
        );
    }

    #[test]
    fn test_sort_by_date_of_birth() {
        let seq = SequenceGenerator::new();
        let collection = sample(&seq);

        assert_eq!(
            names(&collection.sort_by_date_of_birth()),
            vec![
                "Young Emily 1978-09-02",
                "Doe John 1990-02-10",
                "Brown Amy 1995-03-13",
                "Brown Amy 1999-06-20",
                "Brown Debbie 1999-08-31",
                "Craig Alex 2001-02-10",
            ]
        );
    }

    #[test]
    fn test_sort_by_last_name_descending() {
        let seq = SequenceGenerator::new();
        let collection = sample(&seq);

        assert_eq!(
            names(&collection.sort_by_last_name_descending()),
            vec![
                "Young Emily 1978-09-02",
                "Doe John 1990-02-10",
                "Craig Alex 2001-02-10",
                "Brown Amy 1995-03-13",
                "Brown Amy 1999-06-20",
                "Brown Debbie 1999-08-31",
            ]
        );
    }

    #[test]
    fn test_sort_by_last_name_then_first_name() {
        let seq = SequenceGenerator::new();
        let collection = sample(&seq);

        assert_eq!(
            names(&collection.sort_by_last_name_then_first_name()),
            vec![
                "Brown Amy 1995-03-13",
                "Brown Amy 1999-06-20",
                "Brown Debbie 1999-08-31",
                "Craig Alex 2001-02-10",
                "Doe John 1990-02-10",
                "Young Emily 1978-09-02",
            ]
        );
    }

    #[test]
    fn test_sort_by_color_then_last_name() {
        let seq = SequenceGenerator::new();
        let collection = sample(&seq);
        let colors: Vec<&str> = collection
            .sort_by_color_then_last_name()
            .iter()
            .map(|r| r.favorite_color())
            .collect();

        // The Orange duplicate replaced the first Red Amy
        assert_eq!(colors, vec!["Blue", "Green", "Orange", "Purple", "Red", "White"]);
    }

    #[test]
    fn test_sorted_view_is_repeatable_and_fresh() {
        let seq = SequenceGenerator::new();
        let mut collection = sample(&seq);

        let first: Vec<u64> = collection.sort_by_date_of_birth().iter().map(|r| r.id()).collect();
        let second: Vec<u64> = collection.sort_by_date_of_birth().iter().map(|r| r.id()).collect();
        assert_eq!(first, second);

        collection.add(record(&seq, "Old", "Timer", Gender::Male, "Grey", (1930, 1, 1)));
        let third = collection.sort_by_date_of_birth();
        assert_eq!(third[0].last_name(), "Old");
        assert_eq!(third.len(), 7);
    }

    #[test]
    fn test_ingest_skips_bad_lines() {
        let parser = LineParser::new();
        let mut collection = RecordCollection::new();
        let report = collection.ingest(
            &sources(vec![TextSource::new(
                "records1.txt",
                "Doe, John, Male, Blue, 2/10/90\n\nDoe John Man Blue 2/10/90\nYoung | Emily | F | Green | 9/2/1978\n",
            )]),
            &parser,
        );

        assert_eq!(collection.len(), 2);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0].line, 2);
        assert_eq!(report.rejected[0].error, ParseError::BlankInput);
        assert_eq!(report.rejected[1].line, 3);
        assert_eq!(report.rejected[1].error, ParseError::InvalidGender("Man".to_string()));
        assert!(!report.is_clean());
    }

    #[test]
    fn test_ingest_dedups_across_sources_last_write_wins() {
        let parser = LineParser::new();
        let collection = RecordCollection::create_from_sources(
            &sources(vec![
                TextSource::new("a", "Brown, Amy, F, Red, 3/13/1995"),
                TextSource::new("b", "brown amy female Orange 03/13/95"),
            ]),
            &parser,
        );

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.iter().next().unwrap().favorite_color(), "Orange");
    }

    #[test]
    fn test_missing_source_does_not_abort() {
        let dir = tempfile::TempDir::new().unwrap();
        let parser = LineParser::new();
        let list: Vec<Box<dyn LineSource>> = vec![
            Box::new(FileSource::new(dir.path().join("missing.txt"))),
            Box::new(TextSource::new("b", "Craig Alex Male Purple 2/10/2001")),
        ];

        let mut collection = RecordCollection::new();
        let report = collection.ingest(&list, &parser);

        assert_eq!(collection.len(), 1);
        assert_eq!(report.unavailable.len(), 1);
        assert!(report.unavailable[0].source.ends_with("missing.txt"));
        assert_eq!(report.summary(), "1 accepted, 0 rejected, 1 unavailable sources");
    }

    #[test]
    fn test_undecodable_line_is_skipped() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Doe John Male Blue 2/10/90\n\xff\xfe bad\nCraig Alex Male Purple 2/10/2001\n")
            .unwrap();

        let parser = LineParser::new();
        let list: Vec<Box<dyn LineSource>> = vec![Box::new(FileSource::new(file.path()))];
        let mut collection = RecordCollection::new();
        let report = collection.ingest(&list, &parser);

        assert_eq!(collection.len(), 2);
        assert_eq!(report.accepted, 2);
        assert!(report.unavailable.is_empty());
        assert!(report.rejected.is_empty());
        assert_eq!(report.undecodable.len(), 1);
        assert_eq!(report.undecodable[0].line, 2);
        assert!(!report.is_clean());
        assert_eq!(report.summary(), "2 accepted, 1 rejected, 0 unavailable sources");
    }
}
