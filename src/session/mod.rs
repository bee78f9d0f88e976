//! Typing session: drives the engine with keystrokes from a keyboard decoder
//! and forwards every render decision to a display

mod controller;
mod keys;

pub use controller::{RunOutcome, SessionController, SessionError};
pub use keys::{Action, Key, Keystroke};

use crate::engine::RenderDecision;
use std::io;

/// Blocking source of decoded keystrokes
pub trait KeySource {
    /// Wait for the next keystroke
    fn next_key(&mut self) -> io::Result<Keystroke>;
}

/// Display collaborator for a typing session
///
/// Calls arrive strictly in keystroke order.
pub trait RenderSink {
    /// Show the reference line the user is about to type
    fn begin_line(&mut self, reference: &str);

    /// Display one judged character
    fn emit(&mut self, decision: RenderDecision, ch: char);

    /// Erase the last `n` displayed characters
    fn erase_last(&mut self, n: usize);

    /// Close the current line
    fn end_line(&mut self);
}

impl<T: KeySource + ?Sized> KeySource for &mut T {
    fn next_key(&mut self) -> io::Result<Keystroke> {
        (**self).next_key()
    }
}

impl<T: RenderSink + ?Sized> RenderSink for &mut T {
    fn begin_line(&mut self, reference: &str) {
        (**self).begin_line(reference)
    }

    fn emit(&mut self, decision: RenderDecision, ch: char) {
        (**self).emit(decision, ch)
    }

    fn erase_last(&mut self, n: usize) {
        (**self).erase_last(n)
    }

    fn end_line(&mut self) {
        (**self).end_line()
    }
}
