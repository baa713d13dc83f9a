// src/keymap/key.rs - Chord notation (`C-s`, `A-ret`, `space`) and macro key strings

use crossterm::event::{KeyCode, KeyModifiers};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("empty key")]
    Empty,
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
    #[error("modifier `{0}` given twice")]
    RepeatedModifier(String),
    #[error("invalid key `{0}`")]
    InvalidKey(String),
    #[error("unterminated `<` in macro")]
    UnterminatedMacro,
}

/// Named keys, in the spelling the editor expects.
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("backspace", KeyCode::Backspace),
    ("space", KeyCode::Char(' ')),
    ("ret", KeyCode::Enter),
    ("minus", KeyCode::Char('-')),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("pageup", KeyCode::PageUp),
    ("pagedown", KeyCode::PageDown),
    ("tab", KeyCode::Tab),
    ("del", KeyCode::Delete),
    ("ins", KeyCode::Insert),
    ("null", KeyCode::Null),
    ("esc", KeyCode::Esc),
    ("lt", KeyCode::Char('<')),
    ("gt", KeyCode::Char('>')),
    ("plus", KeyCode::Char('+')),
    ("semicolon", KeyCode::Char(';')),
    ("percent", KeyCode::Char('%')),
    ("capslock", KeyCode::CapsLock),
    ("scrolllock", KeyCode::ScrollLock),
    ("numlock", KeyCode::NumLock),
    ("printscreen", KeyCode::PrintScreen),
    ("pause", KeyCode::Pause),
    ("menu", KeyCode::Menu),
];

// Display order for modifiers.
const MODIFIERS: &[(&str, KeyModifiers)] = &[
    ("C", KeyModifiers::CONTROL),
    ("A", KeyModifiers::ALT),
    ("S", KeyModifiers::SHIFT),
    ("Meta", KeyModifiers::META),
    ("Cmd", KeyModifiers::SUPER),
];

/// One key press: a key code plus the modifiers held with it.
///
/// Chords are normalised on construction so equivalent spellings compare
/// equal: `S-a` and `A` are the same chord, and modifier order is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyChord {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        let mut chord = Self { code, modifiers };
        chord.normalize();
        chord
    }

    pub fn plain(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn normalize(&mut self) {
        if let KeyCode::Char(c) = self.code
            && c.is_alphabetic()
            && self.modifiers.contains(KeyModifiers::SHIFT)
        {
            let mut upper = c.to_uppercase();
            if let (Some(u), None) = (upper.next(), upper.next()) {
                self.code = KeyCode::Char(u);
                self.modifiers.remove(KeyModifiers::SHIFT);
            }
        }
    }
}

fn parse_modifier(token: &str) -> Result<KeyModifiers, KeyParseError> {
    match token {
        "C" => Ok(KeyModifiers::CONTROL),
        "A" => Ok(KeyModifiers::ALT),
        "S" => Ok(KeyModifiers::SHIFT),
        "Meta" | "M" => Ok(KeyModifiers::META),
        "Cmd" | "D" => Ok(KeyModifiers::SUPER),
        other => Err(KeyParseError::UnknownModifier(other.to_string())),
    }
}

fn parse_code(token: &str) -> Result<KeyCode, KeyParseError> {
    if token.is_empty() {
        return Err(KeyParseError::Empty);
    }
    if let Some((_, code)) = NAMED_KEYS.iter().find(|(name, _)| *name == token) {
        return Ok(*code);
    }
    if let Some(number) = token.strip_prefix('F')
        && !number.is_empty()
    {
        return match number.parse::<u8>() {
            Ok(n @ 1..=24) => Ok(KeyCode::F(n)),
            _ => Err(KeyParseError::InvalidKey(token.to_string())),
        };
    }

    // A literal key must be one grapheme made of one char.
    let mut graphemes = token.graphemes(true);
    let mut chars = token.chars();
    match (graphemes.next(), graphemes.next(), chars.next(), chars.next()) {
        (Some(_), None, Some(c), None) => Ok(KeyCode::Char(c)),
        _ => Err(KeyParseError::InvalidKey(token.to_string())),
    }
}

impl FromStr for KeyChord {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(KeyParseError::Empty);
        }
        if s == "-" {
            return Ok(KeyChord::plain('-'));
        }

        // `C--` binds ctrl+minus: the trailing dash is the key itself.
        let (prefix, key) = match s.strip_suffix("--") {
            Some(prefix) => (Some(prefix), "-"),
            None => match s.rsplit_once('-') {
                Some((prefix, key)) => (Some(prefix), key),
                None => (None, s),
            },
        };

        let mut modifiers = KeyModifiers::NONE;
        if let Some(prefix) = prefix {
            for token in prefix.split('-') {
                let modifier = parse_modifier(token)?;
                if modifiers.contains(modifier) {
                    return Err(KeyParseError::RepeatedModifier(token.to_string()));
                }
                modifiers |= modifier;
            }
        }

        let code = if key == "-" {
            KeyCode::Char('-')
        } else {
            parse_code(key)?
        };
        Ok(KeyChord::new(code, modifiers))
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, modifier) in MODIFIERS {
            if self.modifiers.contains(*modifier) {
                write!(f, "{}-", name)?;
            }
        }
        if let Some((name, _)) = NAMED_KEYS.iter().find(|(_, code)| *code == self.code) {
            return f.write_str(name);
        }
        match self.code {
            KeyCode::F(n) => write!(f, "F{}", n),
            KeyCode::Char(c) => write!(f, "{}", c),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Parse the key string of a macro binding (`@` already stripped).
///
/// Plain characters are one key each; anything inside `<...>` is chord
/// notation, so `<C-a>` is ctrl+a and `<lt>` is a literal `<`.
pub fn parse_macro(keys: &str) -> Result<Vec<KeyChord>, KeyParseError> {
    let mut chords = Vec::new();
    let mut rest = keys;
    while let Some(c) = rest.chars().next() {
        if c == '<' {
            let end = rest.find('>').ok_or(KeyParseError::UnterminatedMacro)?;
            chords.push(rest[1..end].parse()?);
            rest = &rest[end + 1..];
        } else {
            chords.push(KeyChord::plain(c));
            rest = &rest[c.len_utf8()..];
        }
    }
    if chords.is_empty() {
        return Err(KeyParseError::Empty);
    }
    Ok(chords)
}
