//! TypingStats - measure typing speed and accuracy
//!
//! Compares a live stream of keystrokes against a reference text character
//! by character, supports single-character and word-level undo, and reports
//! accuracy, keys per second and words per minute.

pub mod config;
pub mod engine;
pub mod menu;
pub mod metrics;
pub mod report;
pub mod session;
pub mod terminal;
pub mod text;

pub use config::Config;
pub use engine::{DiffEngine, RenderDecision};
pub use metrics::Metrics;
pub use session::{RunOutcome, SessionController};
