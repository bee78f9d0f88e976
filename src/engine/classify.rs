//! Character classification for typed keys

/// Class of a single decoded character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyClass {
    /// Letters and digits; the only content that forms words
    Alphanumeric,
    /// Blanks and punctuation, treated uniformly as non-word content
    Whitespace,
    /// C0/C1 control characters (tab excluded)
    Control,
    /// Characters that are never rendered (format marks, private use, noncharacters)
    Unprintable,
}

impl KeyClass {
    /// Whether characters of this class may be typed and rendered
    pub fn is_printable(&self) -> bool {
        matches!(self, Self::Alphanumeric | Self::Whitespace)
    }

    pub fn is_word(&self) -> bool {
        *self == Self::Alphanumeric
    }
}

/// Classify a character. Total and side-effect free.
pub fn classify(ch: char) -> KeyClass {
    if ch.is_alphanumeric() {
        KeyClass::Alphanumeric
    } else if ch == '\t' {
        KeyClass::Whitespace
    } else if ch.is_control() {
        KeyClass::Control
    } else if is_unrendered(ch) {
        KeyClass::Unprintable
    } else {
        KeyClass::Whitespace
    }
}

fn is_unrendered(ch: char) -> bool {
    matches!(
        ch,
        '\u{00AD}'
            | '\u{200B}'..='\u{200F}'
            | '\u{2028}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{E000}'..='\u{F8FF}'
            | '\u{F0000}'..='\u{10FFFF}'
    ) || (ch as u32 & 0xFFFE) == 0xFFFE
        || ('\u{FDD0}'..='\u{FDEF}').contains(&ch)
}
