//! Startup menu listing the available test texts

use crate::config::FilesConfig;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

const PROMPT: &str = "Select a test # to run or enter 'Q' to quit: ";

/// A test text offered by the menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestEntry {
    pub path: PathBuf,
    /// Trimmed first line, or `None` when the file could not be read
    pub preview: Option<String>,
}

impl TestEntry {
    fn read(path: PathBuf) -> Self {
        let preview = first_line(&path)
            .map_err(|e| log::warn!("cannot preview {}: {}", path.display(), e))
            .ok();
        Self { path, preview }
    }

    /// Menu label, with the preview cut to `max_chars` characters
    pub fn label(&self, max_chars: usize) -> String {
        match &self.preview {
            Some(line) => {
                let short: String = line.chars().take(max_chars).collect();
                format!("{}...", short)
            }
            None => {
                let name = self
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| self.path.display().to_string());
                format!("{} (caution: may not work)", name)
            }
        }
    }
}

fn first_line(path: &Path) -> io::Result<String> {
    let mut line = String::new();
    BufReader::new(File::open(path)?).read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Find test texts named `<prefix>*.<extension>` in the configured directory,
/// sorted by file name. A missing directory yields an empty list.
pub fn discover(files: &FilesConfig) -> Vec<TestEntry> {
    let dir = match fs::read_dir(&files.tests_dir) {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!("cannot list {}: {}", files.tests_dir.display(), e);
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = dir
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_test_file(path, files))
        .collect();
    paths.sort();

    paths.into_iter().map(TestEntry::read).collect()
}

fn is_test_file(path: &Path, files: &FilesConfig) -> bool {
    let name_ok = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(&files.test_prefix));
    let ext_ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == files.test_extension);
    name_ok && ext_ok
}

/// A parsed menu response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Run(usize),
    Quit,
    Invalid,
}

impl Selection {
    pub fn parse(response: &str, count: usize) -> Self {
        let response = response.trim();
        if response.eq_ignore_ascii_case("q") {
            return Self::Quit;
        }
        if !response.is_empty() && response.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(index) = response.parse::<usize>() {
                if index < count {
                    return Self::Run(index);
                }
            }
        }
        Self::Invalid
    }
}

/// Show the menu and read responses until a test is picked or the user quits.
///
/// Returns `None` to quit; end of input counts as quitting.
pub fn choose<R: BufRead, W: Write>(
    entries: &[TestEntry],
    preview_chars: usize,
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<PathBuf>> {
    writeln!(output, "TypingStats")?;
    for (i, entry) in entries.iter().enumerate() {
        writeln!(output, "{}. {}", i, entry.label(preview_chars))?;
    }

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let mut response = String::new();
        if input.read_line(&mut response)? == 0 {
            return Ok(None);
        }

        match Selection::parse(&response, entries.len()) {
            Selection::Run(index) => return Ok(Some(entries[index].path.clone())),
            Selection::Quit => return Ok(None),
            Selection::Invalid => writeln!(output, "Invalid response.")?,
        }
    }
}
