//! Terminal collaborators built on crossterm
//!
//! Decodes raw key events into [`Keystroke`]s, renders judged characters in
//! color, and handles screen clearing and raw mode.

use crate::config::{KeysConfig, Theme};
use crate::engine::RenderDecision;
use crate::session::{Key, KeySource, Keystroke, RenderSink};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};

/// Colors used for each render decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub correct: Color,
    pub mismatch: Color,
    pub extra: Color,
    pub missing: Color,
}

impl ThemeColors {
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    /// Bright colors for dark terminals
    pub fn dark() -> Self {
        Self {
            correct: Color::Green,
            mismatch: Color::Red,
            extra: Color::Yellow,
            missing: Color::Yellow,
        }
    }

    /// Darker shades that stay readable on bright backgrounds
    pub fn light() -> Self {
        Self {
            correct: Color::DarkGreen,
            mismatch: Color::DarkRed,
            extra: Color::DarkYellow,
            missing: Color::DarkYellow,
        }
    }

    pub fn color_for(&self, decision: RenderDecision) -> Color {
        match decision {
            RenderDecision::Correct => self.correct,
            RenderDecision::Mismatch => self.mismatch,
            RenderDecision::Extra => self.extra,
            RenderDecision::Missing => self.missing,
        }
    }
}

/// Map a crossterm key event to a logical keystroke.
///
/// Returns `None` for key releases. Which backspace chord means word undo
/// depends on the terminal; `swap_backspace` flips the two. Windows reports
/// AltGr as Ctrl+Alt, so those chords on anything but an ASCII letter are
/// plain characters.
pub fn decode(event: &KeyEvent, keys: &KeysConfig) -> Option<Keystroke> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = event.modifiers.contains(KeyModifiers::ALT);

    let stroke = match event.code {
        KeyCode::Char(ch) if ctrl && alt && !ch.is_ascii_alphabetic() => Keystroke::char(ch),
        KeyCode::Char('c' | 'q' | 'z') if ctrl => Keystroke::named(Key::Interrupt),
        KeyCode::Char('h' | 'w') if ctrl => Keystroke::named(Key::WordBackspace),
        KeyCode::Char(ch) if ctrl || alt => Keystroke::extended(Key::Character(ch)),
        KeyCode::Char(ch) => Keystroke::char(ch),
        KeyCode::Tab => Keystroke::char('\t'),
        KeyCode::Enter => Keystroke::named(Key::Enter),
        KeyCode::Backspace => {
            if (ctrl || alt) != keys.swap_backspace {
                Keystroke::named(Key::WordBackspace)
            } else {
                Keystroke::named(Key::CharBackspace)
            }
        }
        KeyCode::Esc => Keystroke::named(Key::Interrupt),
        _ => Keystroke::extended(Key::Other),
    };
    Some(stroke)
}

/// Blocking keyboard decoder reading crossterm events
pub struct TerminalKeys {
    config: KeysConfig,
}

impl TerminalKeys {
    pub fn new(config: KeysConfig) -> Self {
        Self { config }
    }
}

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> io::Result<Keystroke> {
        loop {
            if let Event::Key(key) = event::read()? {
                if let Some(stroke) = decode(&key, &self.config) {
                    return Ok(stroke);
                }
            }
        }
    }
}

/// Keeps the terminal in raw mode while alive
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("failed to restore terminal mode: {}", e);
        }
    }
}

/// Renders judged characters to a terminal writer
pub struct TerminalSink<W: Write> {
    out: W,
    colors: ThemeColors,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, colors: ThemeColors) -> Self {
        Self { out, colors }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn report(result: io::Result<()>) {
        if let Err(e) = result {
            log::warn!("terminal write failed: {}", e);
        }
    }
}

/// Tabs are drawn one column wide so `erase_last` counts match the screen.
fn one_column(ch: char) -> char {
    if ch == '\t' {
        ' '
    } else {
        ch
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn begin_line(&mut self, reference: &str) {
        let shown: String = reference.chars().map(one_column).collect();
        let result = queue!(self.out, ResetColor, Print(shown), Print("\r\n"))
            .and_then(|_| self.out.flush());
        Self::report(result);
    }

    fn emit(&mut self, decision: RenderDecision, ch: char) {
        let color = self.colors.color_for(decision);
        let result = queue!(self.out, SetForegroundColor(color), Print(one_column(ch)))
            .and_then(|_| self.out.flush());
        Self::report(result);
    }

    fn erase_last(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        let back = "\x08".repeat(n);
        let erase = format!("{}{}{}", back, " ".repeat(n), back);
        let result =
            queue!(self.out, ResetColor, Print(erase)).and_then(|_| self.out.flush());
        Self::report(result);
    }

    fn end_line(&mut self) {
        let result = queue!(self.out, ResetColor, Print("\r\n")).and_then(|_| self.out.flush());
        Self::report(result);
    }
}

/// Reset styling, clear the screen and scroll-back, and home the cursor.
pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(
        out,
        ResetColor,
        terminal::Clear(ClearType::Purge),
        terminal::Clear(ClearType::All),
        cursor::MoveTo(0, 0)
    )
}

/// Block until any key is pressed.
pub fn wait_for_key() -> io::Result<()> {
    let _raw = RawModeGuard::enable()?;
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Release {
                return Ok(());
            }
        }
    }
}
