//! Word boundary tracking
//!
//! A word is a maximal run of alphanumeric characters. The tracker only
//! reports a change in word count when the typed tail enters a word (forward
//! typing) or leaves the word it had entered (undo), so both directions of
//! editing keep the count equal to the number of words present in the buffer.

use super::classify::KeyClass;

/// Classification of the tail of the typed buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordState {
    /// Nothing typed on this line yet
    #[default]
    Initial,
    /// Last retained character is alphanumeric
    InWord,
    /// Last retained character is whitespace or punctuation
    InGap,
}

impl WordState {
    /// State implied by the class of the buffer's last character, or
    /// `Initial` for an empty buffer.
    pub fn for_tail(tail: Option<KeyClass>) -> Self {
        match tail {
            None => Self::Initial,
            Some(KeyClass::Alphanumeric) => Self::InWord,
            Some(_) => Self::InGap,
        }
    }

    /// Advance on an accepted character.
    ///
    /// Returns the next state and whether a new word was started.
    pub fn on_accept(self, class: KeyClass) -> (Self, bool) {
        match (self, class) {
            (Self::InWord, KeyClass::Alphanumeric) => (Self::InWord, false),
            (_, KeyClass::Alphanumeric) => (Self::InWord, true),
            (_, KeyClass::Whitespace) => (Self::InGap, false),
            // non-printable input never reaches the buffer
            (state, KeyClass::Control | KeyClass::Unprintable) => (state, false),
        }
    }

    /// Retreat after the buffer tail was removed.
    ///
    /// `tail` is the class of the new last character (`None` once the buffer
    /// is empty). Returns the next state and whether the word being erased
    /// must be uncounted, which happens exactly when the retreat leaves
    /// `InWord`.
    pub fn on_retreat(self, tail: Option<KeyClass>) -> (Self, bool) {
        let next = Self::for_tail(tail);
        let uncounted = self == Self::InWord && next != Self::InWord;
        (next, uncounted)
    }
}
