//! Six-key chord decoder.
//!
//! Keys are pressed and released asynchronously; every key pressed while a
//! chord is open contributes its dot, and the chord resolves to one cell once
//! all keys are up.

use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::BrailleCell;

/// Default chord keys for dots 1 to 6 (home row of a QWERTY keyboard)
pub const DEFAULT_CHORD_KEYS: &str = "fdsjkl";

/// How a key release affects the set of held keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseModel {
    /// Each release clears only its own key
    #[default]
    PerKey,
    /// Any release clears all held keys (platforms that do not report every release)
    AllAtOnce,
}

impl ReleaseModel {
    /// Release model of the host platform
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            ReleaseModel::AllAtOnce
        } else {
            ReleaseModel::PerKey
        }
    }
}

impl FromStr for ReleaseModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ReleaseModel::platform_default()),
            "per-key" | "per_key" => Ok(ReleaseModel::PerKey),
            "all-at-once" | "all_at_once" => Ok(ReleaseModel::AllAtOnce),
            _ => Err(format!("Unknown release model: {}", s)),
        }
    }
}

impl fmt::Display for ReleaseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseModel::PerKey => write!(f, "per-key"),
            ReleaseModel::AllAtOnce => write!(f, "all-at-once"),
        }
    }
}

/// Characters assigned to dots 1 to 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordKeys([char; 6]);

impl ChordKeys {
    /// Dot bit for `ch`, if it is a chord key
    pub fn dot_bit(&self, ch: char) -> Option<u8> {
        let ch = ch.to_ascii_lowercase();
        self.0
            .iter()
            .position(|&key| key == ch)
            .map(|index| 1 << index)
    }

    /// Key for dot `dot` (1..=6)
    pub fn key_for_dot(&self, dot: u8) -> Option<char> {
        (1..=6).contains(&dot).then(|| self.0[(dot - 1) as usize])
    }
}

impl Default for ChordKeys {
    fn default() -> Self {
        ChordKeys(['f', 'd', 's', 'j', 'k', 'l'])
    }
}

impl FromStr for ChordKeys {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let keys: Vec<char> = s.chars().map(|c| c.to_ascii_lowercase()).collect();
        if keys.len() != 6 {
            return Err(format!("Chord keys must be 6 characters, got {}", keys.len()));
        }
        for (i, key) in keys.iter().enumerate() {
            if keys[i + 1..].contains(key) {
                return Err(format!("Chord key '{}' is assigned twice", key));
            }
            if key.is_whitespace() || key.is_control() {
                return Err(format!("Chord key {:?} is not printable", key));
            }
        }
        let mut array = [' '; 6];
        array.copy_from_slice(&keys);
        Ok(ChordKeys(array))
    }
}

/// Chord state machine: idle until a chord key goes down, accumulating until
/// every held key is released.
#[derive(Debug, Clone, Default)]
pub struct ChordDecoder {
    keys: ChordKeys,
    release_model: ReleaseModel,
    /// Keys currently down
    held: u8,
    /// Dots pressed since the chord opened
    dots: u8,
}

impl ChordDecoder {
    pub fn new(keys: ChordKeys, release_model: ReleaseModel) -> Self {
        Self {
            keys,
            release_model,
            held: 0,
            dots: 0,
        }
    }

    pub fn keys(&self) -> &ChordKeys {
        &self.keys
    }

    pub fn release_model(&self) -> ReleaseModel {
        self.release_model
    }

    /// No chord in progress
    pub fn is_idle(&self) -> bool {
        self.held == 0 && self.dots == 0
    }

    /// Dots accumulated by the open chord
    pub fn pending_dots(&self) -> u8 {
        self.dots
    }

    /// Key pressed. Returns whether it was a chord key.
    pub fn key_down(&mut self, ch: char) -> bool {
        match self.keys.dot_bit(ch) {
            Some(bit) => {
                self.held |= bit;
                self.dots |= bit;
                true
            }
            None => false,
        }
    }

    /// Key released. Returns the cell if this release completed a chord.
    pub fn key_up(&mut self, ch: char) -> Option<BrailleCell> {
        let bit = self.keys.dot_bit(ch);
        self.release(bit)
    }

    /// Drive the decoder from a terminal key event
    pub fn handle_event(&mut self, key: &KeyEvent) -> Option<BrailleCell> {
        match (key.kind, key.code) {
            (KeyEventKind::Press | KeyEventKind::Repeat, KeyCode::Char(ch)) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    self.key_down(ch);
                }
                None
            }
            (KeyEventKind::Release, KeyCode::Char(ch)) => self.key_up(ch),
            (KeyEventKind::Release, _) => self.release(None),
            _ => None,
        }
    }

    /// Abandon the open chord
    pub fn reset(&mut self) {
        self.held = 0;
        self.dots = 0;
    }

    fn release(&mut self, bit: Option<u8>) -> Option<BrailleCell> {
        match self.release_model {
            ReleaseModel::AllAtOnce => self.held = 0,
            ReleaseModel::PerKey => {
                if let Some(bit) = bit {
                    self.held &= !bit;
                }
            }
        }

        if self.held != 0 || self.dots == 0 {
            return None;
        }

        let cell = BrailleCell::from_dots(self.dots);
        log::debug!("Chord resolved: dots {:06b}", self.dots);
        self.dots = 0;
        cell
    }
}
