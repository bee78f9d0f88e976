//! Session controller: one typing run over a list of reference lines

use super::{Action, KeySource, RenderSink};
use crate::engine::{AggregateCounters, DiffEngine};
use crate::metrics::Metrics;
use std::io;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Failure while running a session
#[derive(Debug, Error)]
pub enum SessionError {
    /// The keyboard decoder could not deliver a keystroke
    #[error("keyboard input failed: {0}")]
    Input(#[from] io::Error),
}

/// Result of one run
#[derive(Debug)]
pub struct RunOutcome {
    pub counters: AggregateCounters,
    /// Time from the first keystroke to the end of the run
    pub elapsed: Duration,
    /// Whether the run was interrupted before the last line
    pub aborted: bool,
    /// Lines closed with Enter
    pub lines_completed: usize,
    /// Set when keyboard input failed; the run stopped as if interrupted
    pub input_error: Option<SessionError>,
}

impl RunOutcome {
    pub fn metrics(&self) -> Metrics {
        Metrics::compute(self.elapsed, &self.counters)
    }
}

/// Feeds keystrokes into a [`DiffEngine`] line by line
pub struct SessionController<K, R> {
    keys: K,
    sink: R,
    engine: DiffEngine,
    start_time: Option<Instant>,
}

impl<K: KeySource, R: RenderSink> SessionController<K, R> {
    pub fn new(keys: K, sink: R) -> Self {
        Self {
            keys,
            sink,
            engine: DiffEngine::new(),
            start_time: None,
        }
    }

    /// Type every line in order until the last Enter or an interrupt.
    ///
    /// The duration timer starts at the first keystroke of the run, so time
    /// spent before the user begins typing is excluded. A failing key source
    /// ends the run like an interrupt, keeping the counters gathered so far.
    pub fn run<S: AsRef<str>>(&mut self, lines: &[S]) -> RunOutcome {
        let mut lines_completed = 0;
        let mut input_error = None;

        'lines: for line in lines {
            let line = line.as_ref();
            if !self.engine.begin_line(line) {
                break;
            }
            self.sink.begin_line(line);

            loop {
                let stroke = match self.keys.next_key() {
                    Ok(stroke) => stroke,
                    Err(e) => {
                        log::error!(
                            "keyboard input failed on line {}: {}",
                            lines_completed + 1,
                            e
                        );
                        self.engine.abort();
                        self.sink.end_line();
                        input_error = Some(SessionError::from(e));
                        break 'lines;
                    }
                };
                self.engine.record_keystroke();
                if self.start_time.is_none() {
                    log::debug!("timer started");
                    self.start_time = Some(Instant::now());
                }

                match Action::from(stroke) {
                    Action::Accept(ch) => {
                        if let Some(rendered) = self.engine.accept_printable(ch) {
                            self.sink.emit(rendered.decision, rendered.ch);
                        }
                    }
                    Action::UndoOne => {
                        let erased = self.engine.undo_one();
                        if erased > 0 {
                            self.sink.erase_last(erased);
                        }
                    }
                    Action::UndoWord => {
                        let erased = self.engine.undo_word();
                        self.sink.erase_last(erased);
                    }
                    Action::FinishLine => {
                        for rendered in self.engine.finish_line() {
                            self.sink.emit(rendered.decision, rendered.ch);
                        }
                        self.sink.end_line();
                        lines_completed += 1;
                        break;
                    }
                    Action::Abort => {
                        log::info!("run interrupted on line {}", lines_completed + 1);
                        self.engine.abort();
                        self.sink.end_line();
                        break 'lines;
                    }
                    Action::Ignore => {
                        log::trace!("ignored {:?}", stroke);
                    }
                }
            }
        }

        let elapsed = self
            .start_time
            .map(|start| start.elapsed())
            .unwrap_or(Duration::ZERO);

        RunOutcome {
            counters: self.engine.counters(),
            elapsed,
            aborted: self.engine.is_aborted(),
            lines_completed,
            input_error,
        }
    }

    pub fn engine(&self) -> &DiffEngine {
        &self.engine
    }

    pub fn into_parts(self) -> (K, R) {
        (self.keys, self.sink)
    }
}
