//! Incremental diff and edit state machine
//!
//! [`DiffEngine`] consumes one keystroke at a time for the current reference
//! line, judges each accepted character against the reference, and keeps the
//! typed buffer, its correctness history, the word boundary state and the
//! run-wide counters consistent across forward typing and undo.
//!
//! The engine performs no I/O. Every operation returns what the caller has to
//! render: a [`Rendered`] character or the number of positions to erase.

use super::boundary::WordState;
use super::classify::classify;
use serde::{Deserialize, Serialize};

/// How a single character should be displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderDecision {
    /// Typed character matches the reference
    Correct,
    /// Typed beyond the end of the reference
    Extra,
    /// Reference character that was never typed
    Missing,
    /// Typed character differs from the reference
    Mismatch,
}

/// A render decision together with the character to display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rendered {
    pub decision: RenderDecision,
    pub ch: char,
}

impl Rendered {
    pub fn new(decision: RenderDecision, ch: char) -> Self {
        Self { decision, ch }
    }
}

/// Counters accumulated over every line of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCounters {
    /// Judged characters, including untyped reference tails
    pub total_characters: u64,
    /// Retained characters judged correct
    pub correct_characters: u64,
    /// Every key read while typing
    pub typed_keystrokes: u64,
    /// Words started and still present
    pub word_count: u64,
}

/// Judge a typed character against the reference character at its position.
///
/// `None` on the reference side means the position is past the end of the
/// line; `None` on the typed side means the reference character was never
/// typed.
pub fn judge(typed: Option<char>, expected: Option<char>) -> RenderDecision {
    match (typed, expected) {
        (Some(t), Some(e)) if t == e => RenderDecision::Correct,
        (Some(_), Some(_)) => RenderDecision::Mismatch,
        (Some(_), None) => RenderDecision::Extra,
        (None, _) => RenderDecision::Missing,
    }
}

/// Per-line edit state plus run-wide counters
#[derive(Debug, Default)]
pub struct DiffEngine {
    reference: Vec<char>,
    typed: Vec<char>,
    history: Vec<bool>,
    word_state: WordState,
    counters: AggregateCounters,
    line_open: bool,
    aborted: bool,
}

impl DiffEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new reference line, discarding the previous line's buffer.
    ///
    /// Returns `false` (and changes nothing) once the run was aborted.
    pub fn begin_line(&mut self, reference: &str) -> bool {
        if self.aborted {
            return false;
        }
        self.reference = reference.chars().collect();
        self.typed.clear();
        self.history.clear();
        self.word_state = WordState::Initial;
        self.line_open = true;
        true
    }

    /// Count one key read from the keyboard.
    pub fn record_keystroke(&mut self) {
        if !self.aborted {
            self.counters.typed_keystrokes += 1;
        }
    }

    /// Append a printable character and judge it.
    ///
    /// Returns `None` without touching any state when `ch` is not printable,
    /// when no line is open, or after an abort.
    pub fn accept_printable(&mut self, ch: char) -> Option<Rendered> {
        if !self.line_open || self.aborted {
            return None;
        }
        let class = classify(ch);
        if !class.is_printable() {
            log::warn!("rejected non-printable input {:?} ({:?})", ch, class);
            return None;
        }

        self.typed.push(ch);
        let expected = self.reference.get(self.typed.len() - 1).copied();

        let (next, word_started) = self.word_state.on_accept(class);
        self.word_state = next;
        if word_started {
            self.counters.word_count += 1;
        }

        self.counters.total_characters += 1;
        let decision = judge(Some(ch), expected);
        let correct = decision == RenderDecision::Correct;
        self.history.push(correct);
        if correct {
            self.counters.correct_characters += 1;
        }

        log::trace!("accept {:?} against {:?}: {:?}", ch, expected, decision);
        Some(Rendered::new(decision, ch))
    }

    /// Remove the last typed character.
    ///
    /// Returns the number of display positions to erase (0 or 1).
    pub fn undo_one(&mut self) -> usize {
        if !self.can_undo() {
            return 0;
        }
        usize::from(self.pop_tail().is_some())
    }

    /// Remove the trailing run of same-class characters.
    ///
    /// Starting inside a word removes alphanumerics up to the preceding gap;
    /// starting inside a gap removes blanks and punctuation up to the
    /// preceding word. Returns the number of display positions to erase.
    pub fn undo_word(&mut self) -> usize {
        if !self.can_undo() {
            return 0;
        }
        let in_word = self.word_state == WordState::InWord;
        let mut removed = 0;
        while let Some(&tail) = self.typed.last() {
            if classify(tail).is_word() != in_word {
                break;
            }
            self.pop_tail();
            removed += 1;
        }
        log::trace!("word undo removed {} characters", removed);
        removed
    }

    /// Close the current line, judging every untyped reference character as
    /// missing.
    pub fn finish_line(&mut self) -> Vec<Rendered> {
        if !self.line_open || self.aborted {
            return Vec::new();
        }
        self.line_open = false;

        let missing: Vec<Rendered> = self
            .reference
            .iter()
            .skip(self.typed.len())
            .map(|&ch| Rendered::new(judge(None, Some(ch)), ch))
            .collect();
        self.counters.total_characters += missing.len() as u64;

        log::debug!(
            "line finished: {} typed, {} missing",
            self.typed.len(),
            missing.len()
        );
        missing
    }

    /// Stop the run. Counters freeze at their current values.
    pub fn abort(&mut self) {
        if !self.aborted {
            log::debug!("run aborted with counters {:?}", self.counters);
        }
        self.aborted = true;
        self.line_open = false;
    }

    fn can_undo(&self) -> bool {
        self.line_open && !self.aborted && self.word_state != WordState::Initial
    }

    fn pop_tail(&mut self) -> Option<char> {
        let ch = self.typed.pop()?;
        if self.history.pop() == Some(true) {
            self.counters.correct_characters -= 1;
        }
        self.counters.total_characters -= 1;

        let tail = self.typed.last().map(|&c| classify(c));
        let (next, uncounted) = self.word_state.on_retreat(tail);
        self.word_state = next;
        if uncounted {
            self.counters.word_count -= 1;
        }
        Some(ch)
    }

    /// Characters typed on the current line
    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    /// Correctness of each typed character, index-aligned with [`typed`](Self::typed)
    pub fn history(&self) -> &[bool] {
        &self.history
    }

    pub fn word_state(&self) -> WordState {
        self.word_state
    }

    pub fn counters(&self) -> AggregateCounters {
        self.counters
    }

    pub fn is_line_open(&self) -> bool {
        self.line_open
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn engine_with(reference: &str) -> DiffEngine {
        let mut engine = DiffEngine::new();
        engine.begin_line(reference);
        engine
    }

    fn type_str(engine: &mut DiffEngine, text: &str) -> Vec<RenderDecision> {
        text.chars()
            .filter_map(|ch| engine.accept_printable(ch))
            .map(|r| r.decision)
            .collect()
    }

    #[test]
    fn judge_rules() {
        assert_eq!(judge(Some('a'), Some('a')), RenderDecision::Correct);
        assert_eq!(judge(Some('a'), Some('A')), RenderDecision::Mismatch);
        assert_eq!(judge(Some('a'), None), RenderDecision::Extra);
        assert_eq!(judge(None, Some('a')), RenderDecision::Missing);
    }

    #[test]
    fn exact_match() {
        let mut engine = engine_with("cat");
        let decisions = type_str(&mut engine, "cat");
        assert!(engine.finish_line().is_empty());

        assert_eq!(decisions, vec![RenderDecision::Correct; 3]);
        let counters = engine.counters();
        assert_eq!(counters.total_characters, 3);
        assert_eq!(counters.correct_characters, 3);
        assert_eq!(counters.word_count, 1);
    }

    #[test]
    fn mismatch_in_middle() {
        let mut engine = engine_with("cat");
        let decisions = type_str(&mut engine, "cbt");
        assert_eq!(
            decisions,
            vec![
                RenderDecision::Correct,
                RenderDecision::Mismatch,
                RenderDecision::Correct
            ]
        );
        assert_eq!(engine.history(), &[true, false, true]);
        assert_eq!(engine.counters().correct_characters, 2);
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let mut engine = engine_with("Cat");
        assert_eq!(type_str(&mut engine, "c"), vec![RenderDecision::Mismatch]);
    }

    #[test]
    fn overtype_is_extra() {
        let mut engine = engine_with("cat");
        let decisions = type_str(&mut engine, "catdog");
        assert_eq!(&decisions[3..], &[RenderDecision::Extra; 3]);
        assert_eq!(engine.counters().total_characters, 6);
        assert_eq!(engine.counters().correct_characters, 3);
    }

    #[test]
    fn undershoot_reports_missing_tail() {
        let mut engine = engine_with("cat");
        type_str(&mut engine, "ca");
        let missing = engine.finish_line();
        assert_eq!(missing, vec![Rendered::new(RenderDecision::Missing, 't')]);
        assert_eq!(engine.counters().total_characters, 3);
        assert_eq!(engine.counters().correct_characters, 2);
    }

    #[test]
    fn finished_line_rejects_input() {
        let mut engine = engine_with("cat");
        type_str(&mut engine, "c");
        engine.finish_line();
        assert!(engine.accept_printable('a').is_none());
        assert_eq!(engine.undo_one(), 0);
        assert!(engine.finish_line().is_empty());
        assert_eq!(engine.counters().total_characters, 3);
    }

    #[test]
    fn non_printable_is_rejected() {
        let mut engine = engine_with("cat");
        assert!(engine.accept_printable('\x1b').is_none());
        assert!(engine.accept_printable('\u{200B}').is_none());
        assert!(engine.typed().is_empty());
        assert_eq!(engine.counters(), AggregateCounters::default());
    }

    #[test]
    fn undo_one_restores_counters() {
        let mut engine = engine_with("ab cd");
        type_str(&mut engine, "ab c");
        assert_eq!(engine.counters().word_count, 2);

        assert_eq!(engine.undo_one(), 1);
        assert_eq!(engine.counters().word_count, 1);
        assert_eq!(engine.word_state(), WordState::InGap);

        assert_eq!(engine.undo_one(), 1);
        assert_eq!(engine.word_state(), WordState::InWord);
        assert_eq!(engine.counters().word_count, 1);
    }

    #[test]
    fn undo_one_to_empty_resets_state() {
        let mut engine = engine_with("ab");
        type_str(&mut engine, "ab");
        engine.undo_one();
        engine.undo_one();
        assert_eq!(engine.word_state(), WordState::Initial);
        assert_eq!(engine.counters().word_count, 0);
        assert_eq!(engine.counters().total_characters, 0);
    }

    #[test]
    fn undo_on_empty_is_noop() {
        let mut engine = engine_with("cat");
        engine.record_keystroke();
        let before = engine.counters();
        assert_eq!(engine.undo_one(), 0);
        assert_eq!(engine.undo_word(), 0);
        assert_eq!(engine.counters(), before);
        assert_eq!(engine.word_state(), WordState::Initial);
    }

    #[test]
    fn undo_word_removes_trailing_word() {
        let mut engine = engine_with("ab cd");
        type_str(&mut engine, "ab cd");
        assert_eq!(engine.counters().word_count, 2);

        assert_eq!(engine.undo_word(), 2);
        assert_eq!(engine.typed(), &['a', 'b', ' ']);
        assert_eq!(engine.counters().word_count, 1);
        assert_eq!(engine.word_state(), WordState::InGap);
        assert_eq!(engine.counters().total_characters, 3);
    }

    #[test]
    fn undo_word_stops_at_punctuation() {
        let mut engine = engine_with("a, b");
        type_str(&mut engine, "a, b");
        assert_eq!(engine.word_state(), WordState::InWord);
        assert_eq!(engine.counters().word_count, 2);

        assert_eq!(engine.undo_word(), 1);
        assert_eq!(engine.typed(), &['a', ',', ' ']);
        assert_eq!(engine.counters().word_count, 1);
    }

    #[test]
    fn undo_word_from_gap_removes_gap_only() {
        let mut engine = engine_with("a, b");
        type_str(&mut engine, "a, ");
        assert_eq!(engine.undo_word(), 2);
        assert_eq!(engine.typed(), &['a']);
        assert_eq!(engine.word_state(), WordState::InWord);
        assert_eq!(engine.counters().word_count, 1);
    }

    #[test]
    fn undo_word_of_whole_line_uncounts_once() {
        let mut engine = engine_with("abc");
        type_str(&mut engine, "abc");
        assert_eq!(engine.undo_word(), 3);
        assert!(engine.typed().is_empty());
        assert_eq!(engine.word_state(), WordState::Initial);
        assert_eq!(engine.counters().word_count, 0);
        assert_eq!(engine.counters().correct_characters, 0);
    }

    #[test]
    fn retyping_after_undo_counts_word_again() {
        let mut engine = engine_with("ab");
        type_str(&mut engine, "x");
        engine.undo_one();
        type_str(&mut engine, "ab");
        assert_eq!(engine.counters().word_count, 1);
        assert_eq!(engine.history(), &[true, true]);
    }

    #[test]
    fn counters_persist_across_lines() {
        let mut engine = engine_with("cat");
        type_str(&mut engine, "cat");
        engine.finish_line();
        engine.begin_line("dog");
        assert!(engine.typed().is_empty());
        assert_eq!(engine.word_state(), WordState::Initial);

        type_str(&mut engine, "do");
        engine.finish_line();
        let counters = engine.counters();
        assert_eq!(counters.total_characters, 6);
        assert_eq!(counters.correct_characters, 5);
        assert_eq!(counters.word_count, 2);
    }

    #[test]
    fn undo_does_not_cross_into_previous_line() {
        let mut engine = engine_with("cat");
        type_str(&mut engine, "cat");
        engine.finish_line();
        engine.begin_line("dog");
        assert_eq!(engine.undo_one(), 0);
        assert_eq!(engine.counters().total_characters, 3);
    }

    #[test]
    fn abort_freezes_counters() {
        let mut engine = engine_with("cat");
        type_str(&mut engine, "ca");
        engine.record_keystroke();
        engine.abort();
        let frozen = engine.counters();

        engine.record_keystroke();
        assert!(engine.accept_printable('t').is_none());
        assert_eq!(engine.undo_one(), 0);
        assert!(engine.finish_line().is_empty());
        assert!(!engine.begin_line("dog"));
        assert_eq!(engine.counters(), frozen);
        assert!(engine.is_aborted());
    }

    proptest! {
        #[test]
        fn prop_buffer_and_history_stay_aligned(
            reference in "[a-c ,]{0,12}",
            ops in prop::collection::vec(0u8..6, 0..60)
        ) {
            let mut engine = engine_with(&reference);
            for op in ops {
                match op {
                    0 => { engine.undo_one(); }
                    1 => { engine.undo_word(); }
                    2 => { engine.accept_printable(' '); }
                    3 => { engine.accept_printable(','); }
                    4 => { engine.accept_printable('a'); }
                    _ => { engine.accept_printable('b'); }
                }
                prop_assert_eq!(engine.typed().len(), engine.history().len());
                let expected_words = engine
                    .typed()
                    .split(|c| !c.is_alphanumeric())
                    .filter(|run| !run.is_empty())
                    .count() as u64;
                prop_assert_eq!(engine.counters().word_count, expected_words);
                prop_assert_eq!(
                    engine.counters().correct_characters,
                    engine.history().iter().filter(|&&c| c).count() as u64
                );
            }
        }

        #[test]
        fn prop_undo_round_trip(
            reference in "[a-z ]{0,10}",
            text in "[a-z .,]{0,20}"
        ) {
            let mut engine = engine_with(&reference);
            type_str(&mut engine, "ab ");
            let before = engine.counters();
            let before_typed = engine.typed().to_vec();
            let before_history = engine.history().to_vec();
            let before_state = engine.word_state();

            let n = type_str(&mut engine, &text).len();
            for _ in 0..n {
                prop_assert_eq!(engine.undo_one(), 1);
            }

            prop_assert_eq!(engine.counters(), before);
            prop_assert_eq!(engine.typed(), &before_typed[..]);
            prop_assert_eq!(engine.history(), &before_history[..]);
            prop_assert_eq!(engine.word_state(), before_state);
        }

        #[test]
        fn prop_accept_never_reports_missing(
            reference in "\\PC{0,10}",
            text in "\\PC{0,20}"
        ) {
            let mut engine = engine_with(&reference);
            for ch in text.chars() {
                if let Some(rendered) = engine.accept_printable(ch) {
                    prop_assert_ne!(rendered.decision, RenderDecision::Missing);
                }
            }
        }
    }
}
