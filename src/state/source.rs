//! Where word lists and corpora come from.

use std::fs;
use std::path::PathBuf;

use crate::error::LoadError;

/// A line-oriented text resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    /// Text already in memory (embedded data, tests).
    Inline(String),
    /// A UTF-8 file on disk.
    File(PathBuf),
}

impl TextSource {
    pub fn inline(text: impl Into<String>) -> Self {
        Self::Inline(text.into())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Read the whole resource.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be opened or is not UTF-8.
    pub fn read(&self) -> Result<String, LoadError> {
        match self {
            Self::Inline(text) => Ok(text.clone()),
            Self::File(path) => Ok(fs::read_to_string(path)?),
        }
    }
}
