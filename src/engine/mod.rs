//! Keystroke comparison engine

pub mod boundary;
pub mod classify;
mod diff;

pub use boundary::WordState;
pub use classify::{classify, KeyClass};
pub use diff::{judge, AggregateCounters, DiffEngine, RenderDecision, Rendered};
