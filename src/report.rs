//! Results history and session report export

use crate::metrics::Metrics;
use crate::session::RunOutcome;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The results of a run could not be stored
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("could not save results to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not encode report: {0}")]
    Json(#[from] serde_json::Error),
}

/// One entry of the results history file
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub timestamp: DateTime<Local>,
    /// Identifies the reference text that was typed
    pub input: String,
    pub duration_ns: u128,
    pub total_characters: u64,
    pub correct_characters: u64,
    pub word_count: u64,
}

impl ResultRecord {
    pub fn new(input: impl Into<String>, metrics: &Metrics) -> Self {
        Self {
            timestamp: Local::now(),
            input: input.into(),
            duration_ns: metrics.duration_ns,
            total_characters: metrics.total_characters,
            correct_characters: metrics.correct_characters,
            word_count: metrics.word_count,
        }
    }

    /// Record text: timestamp line, input line, summary line, blank separator
    pub fn to_text(&self) -> String {
        format!(
            "{}\n{}\ndur:{}, len:{}, good:{}, words:{}\n\n",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.6f"),
            self.input,
            self.duration_ns,
            self.total_characters,
            self.correct_characters,
            self.word_count
        )
    }

    /// Append this record to the history file, creating it if needed.
    pub fn append_to(&self, path: &Path) -> Result<(), RecordError> {
        let io_err = |source: io::Error| RecordError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(io_err)?;
        file.write_all(self.to_text().as_bytes()).map_err(io_err)?;
        log::info!("appended results to {}", path.display());
        Ok(())
    }
}

/// Complete session report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Final statistics
    pub summary: Metrics,
    /// Whether the run was interrupted
    pub aborted: bool,
    /// Lines finished with Enter
    pub lines_completed: usize,
    /// Why the run stopped early, if keyboard input failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_error: Option<String>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report generation timestamp
    pub generated_at: String,
    /// Application version
    pub version: String,
    /// Reference text that was typed
    pub input: String,
}

impl SessionReport {
    pub fn new(input: impl Into<String>, outcome: &RunOutcome) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at: Local::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                input: input.into(),
            },
            summary: outcome.metrics(),
            aborted: outcome.aborted,
            lines_completed: outcome.lines_completed,
            input_error: outcome.input_error.as_ref().map(|e| e.to_string()),
        }
    }

    /// Export report to JSON file
    pub fn export_json(&self, path: &Path) -> Result<(), RecordError> {
        let json = self.to_json()?;
        let io_err = |source: io::Error| RecordError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut file = File::create(path).map_err(io_err)?;
        file.write_all(json.as_bytes()).map_err(io_err)?;
        Ok(())
    }

    /// Export report to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AggregateCounters;
    use chrono::TimeZone;
    use std::fs;
    use std::time::Duration;

    fn outcome() -> RunOutcome {
        RunOutcome {
            counters: AggregateCounters {
                total_characters: 3,
                correct_characters: 2,
                typed_keystrokes: 4,
                word_count: 1,
            },
            elapsed: Duration::from_nanos(1_500_000_000),
            aborted: false,
            lines_completed: 1,
            input_error: None,
        }
    }

    fn record() -> ResultRecord {
        let mut record = ResultRecord::new("./tests/test1.txt", &outcome().metrics());
        record.timestamp = Local.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        record
    }

    #[test]
    fn record_text_format() {
        assert_eq!(
            record().to_text(),
            "2025-03-04 05:06:07.000000\n./tests/test1.txt\n\
             dur:1500000000, len:3, good:2, words:1\n\n"
        );
    }

    #[test]
    fn append_accumulates_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");

        record().append_to(&path).unwrap();
        record().append_to(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("dur:1500000000").count(), 2);
        assert!(contents.ends_with("words:1\n\n"));
    }

    #[test]
    fn append_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("results.txt");
        let err = record().append_to(&path).unwrap_err();
        assert!(matches!(err, RecordError::Io { .. }));
        assert!(err.to_string().starts_with("could not save results"));
    }

    #[test]
    fn report_json_contains_summary() {
        let report = SessionReport::new("test1.txt", &outcome());
        let json = report.to_json().unwrap();
        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"accuracy\""));
        assert!(json.contains("\"words_per_minute\""));
        assert!(json.contains("\"input\": \"test1.txt\""));
        assert!(!report.metadata.version.is_empty());
        assert!(!json.contains("input_error"));
    }

    #[test]
    fn report_carries_input_failure() {
        let mut failed = outcome();
        failed.aborted = true;
        failed.input_error = Some(
            io::Error::new(io::ErrorKind::UnexpectedEof, "terminal closed").into(),
        );

        let report = SessionReport::new("test1.txt", &failed);
        assert!(report.aborted);
        assert_eq!(report.summary.total_characters, 3);
        assert_eq!(
            report.input_error.as_deref(),
            Some("keyboard input failed: terminal closed")
        );
        assert!(report.to_json().unwrap().contains("\"input_error\""));
    }

    #[test]
    fn report_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        SessionReport::new("test1.txt", &outcome())
            .export_json(&path)
            .unwrap();

        let parsed: SessionReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.summary.total_characters, 3);
        assert_eq!(parsed.lines_completed, 1);
    }
}
