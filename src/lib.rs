// Record Parser - Core Library
// Exposes all modules for use in the console binary, the API server, and tests

pub mod error;
pub mod record;
pub mod parser;
pub mod ordering;
pub mod source;
pub mod collection;
pub mod config;
#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use error::{ConfigError, ParseError, SourceError};
pub use record::{Gender, IdentityKey, Record, SequenceGenerator};
pub use parser::{parse_date, parse_gender, tokenize, LineParser, FIELD_COUNT, TWO_DIGIT_YEAR_MAX};
pub use ordering::SortOrder;
pub use source::{FileSource, LineSource, TextSource};
pub use collection::{IngestReport, RecordCollection, RejectedLine, UnavailableSource, UndecodableLine};
pub use config::AppConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
