//! Reference text loading

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The reference text could not be used to start a run
#[derive(Debug, Error)]
pub enum TextError {
    #[error("could not find, open, or read test file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("test file {path} contains no text")]
    Empty { path: PathBuf },
}

/// Reference text held fully in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceText {
    lines: Vec<String>,
}

impl ReferenceText {
    /// Split text into lines, dropping trailing `\r` and `\n`.
    pub fn parse(contents: &str) -> Self {
        let lines = contents
            .lines()
            .map(|line| line.trim_end_matches(&['\r', '\n'][..]).to_string())
            .collect();
        Self { lines }
    }

    /// Read a whole file up front so disk I/O never counts toward typing time.
    pub fn load(path: &Path) -> Result<Self, TextError> {
        let contents = fs::read_to_string(path).map_err(|source| TextError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = Self::parse(&contents);
        if text.lines.is_empty() {
            return Err(TextError::Empty {
                path: path.to_path_buf(),
            });
        }
        log::info!("loaded {} lines from {}", text.lines.len(), path.display());
        Ok(text)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}
