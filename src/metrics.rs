//! Final typing statistics

use crate::engine::AggregateCounters;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Statistics for one completed or aborted run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Elapsed typing time in nanoseconds
    pub duration_ns: u128,
    pub total_characters: u64,
    pub correct_characters: u64,
    pub typed_keystrokes: u64,
    pub word_count: u64,
    /// Fraction of judged characters that were correct (0.0 - 1.0)
    pub accuracy: f64,
    pub keys_per_second: f64,
    pub words_per_minute: f64,
}

impl Metrics {
    /// Derive rates from the run's counters.
    ///
    /// A zero duration yields zero rates instead of a division fault, so a
    /// run can always report numbers.
    pub fn compute(elapsed: Duration, counters: &AggregateCounters) -> Self {
        let accuracy = if counters.total_characters > 0 {
            counters.correct_characters as f64 / counters.total_characters as f64
        } else {
            0.0
        };

        let secs = elapsed.as_secs_f64();
        let (keys_per_second, words_per_minute) = if elapsed.is_zero() {
            log::warn!("zero elapsed duration, reporting zero rates");
            (0.0, 0.0)
        } else {
            (
                counters.typed_keystrokes as f64 / secs,
                counters.word_count as f64 / (secs / 60.0),
            )
        };

        Self {
            duration_ns: elapsed.as_nanos(),
            total_characters: counters.total_characters,
            correct_characters: counters.correct_characters,
            typed_keystrokes: counters.typed_keystrokes,
            word_count: counters.word_count,
            accuracy,
            keys_per_second,
            words_per_minute,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_ns as f64 / 1_000_000_000.0
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "duration: {:.1} seconds", self.duration_secs())?;
        writeln!(f, "total characters: {}", self.total_characters)?;
        writeln!(f, "correct characters: {}", self.correct_characters)?;
        writeln!(f, "accuracy: {:.1}%", self.accuracy * 100.0)?;
        writeln!(f, "keys per second: {:.2}", self.keys_per_second)?;
        write!(f, "words per minute: {:.2}", self.words_per_minute)
    }
}
