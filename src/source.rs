// 📂 Line Sources - where record text comes from
// Files on disk, or named in-memory text (request bodies, tests).

use crate::error::SourceError;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

/// Anything that yields an ordered sequence of text lines.
pub trait LineSource {
    /// Name used in diagnostics (file path, "request body", ...)
    fn name(&self) -> &str;

    /// Cheap check before opening
    fn is_available(&self) -> bool;

    /// Open the source for line-by-line reading
    fn open(&self) -> Result<Box<dyn BufRead + '_>, SourceError>;
}

// ============================================================================
// FILE SOURCE
// ============================================================================

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        FileSource { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LineSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn open(&self) -> Result<Box<dyn BufRead + '_>, SourceError> {
        if !self.is_available() {
            return Err(SourceError::unavailable(
                &self.name,
                io::Error::new(io::ErrorKind::NotFound, "Input file was not found"),
            ));
        }

        let file = File::open(&self.path).map_err(|e| SourceError::unavailable(&self.name, e))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

// ============================================================================
// TEXT SOURCE
// ============================================================================

#[derive(Debug, Clone)]
pub struct TextSource {
    name: String,
    text: String,
}

impl TextSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        TextSource {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl LineSource for TextSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        true
    }

    fn open(&self) -> Result<Box<dyn BufRead + '_>, SourceError> {
        Ok(Box::new(Cursor::new(self.text.as_bytes())))
    }
}
