//! Decoded keystrokes and how the controller reacts to them

use crate::engine::classify;

/// A logical key produced by the keyboard decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// An ordinary character
    Character(char),
    /// Finish the current line
    Enter,
    /// Remove one character
    CharBackspace,
    /// Remove the trailing word or gap
    WordBackspace,
    /// Stop the run and report results
    Interrupt,
    /// Any other key (navigation, function keys, ...)
    Other,
}

/// A key together with whether it arrived as an extended (non-character) code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystroke {
    pub key: Key,
    pub extended: bool,
}

impl Keystroke {
    pub fn new(key: Key, extended: bool) -> Self {
        Self { key, extended }
    }

    pub fn char(ch: char) -> Self {
        Self::new(Key::Character(ch), false)
    }

    pub fn named(key: Key) -> Self {
        Self::new(key, false)
    }

    pub fn extended(key: Key) -> Self {
        Self::new(key, true)
    }
}

impl From<Key> for Keystroke {
    fn from(key: Key) -> Self {
        Self::named(key)
    }
}

/// What the controller does with a keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Accept(char),
    UndoOne,
    UndoWord,
    FinishLine,
    Abort,
    Ignore,
}

impl From<Keystroke> for Action {
    fn from(stroke: Keystroke) -> Self {
        match stroke.key {
            Key::Character(ch) if !stroke.extended && classify(ch).is_printable() => {
                Action::Accept(ch)
            }
            Key::Enter => Action::FinishLine,
            Key::CharBackspace => Action::UndoOne,
            Key::WordBackspace => Action::UndoWord,
            Key::Interrupt => Action::Abort,
            Key::Character(_) | Key::Other => Action::Ignore,
        }
    }
}
