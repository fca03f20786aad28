//! Braille cells and the North American ASCII-braille table.

use std::fmt;

/// ASCII-braille character for every dot pattern, indexed by dot mask
/// (dot 1 = bit 0 ... dot 6 = bit 5). Index 0 is the empty cell.
pub const ASCII_BRAILLE: &[u8; 64] =
    b" A1B'K2L@CIF/MSP\"E3H9O6R^DJG>NTQ,*5<-U8V.%[$+X!&;:4\\0Z7(_?W]#Y)=";

const UNICODE_BRAILLE_BASE: u32 = 0x2800;

/// A six-dot braille cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BrailleCell(u8);

impl BrailleCell {
    /// Cell with no dots raised
    pub const EMPTY: BrailleCell = BrailleCell(0);

    /// Build cell from dot mask; `None` if bits above dot 6 are set
    pub fn from_dots(mask: u8) -> Option<Self> {
        (mask < 64).then_some(BrailleCell(mask))
    }

    /// Look up the cell for an ASCII-braille character (case-insensitive)
    pub fn from_ascii(ch: char) -> Option<Self> {
        let upper = ch.to_ascii_uppercase();
        if !upper.is_ascii() {
            return None;
        }
        ASCII_BRAILLE
            .iter()
            .position(|&b| b == upper as u8)
            .map(|index| BrailleCell(index as u8))
    }

    /// Decode a Unicode braille pattern (six-dot range only)
    pub fn from_unicode(ch: char) -> Option<Self> {
        let mask = (ch as u32).checked_sub(UNICODE_BRAILLE_BASE)?;
        if mask < 64 {
            Some(BrailleCell(mask as u8))
        } else {
            None
        }
    }

    /// Dot mask (bit 0 = dot 1)
    pub fn dots(self) -> u8 {
        self.0
    }

    /// Whether dot `dot` (1..=6) is raised
    pub fn has_dot(self, dot: u8) -> bool {
        (1..=6).contains(&dot) && self.0 & (1 << (dot - 1)) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// ASCII-braille character of this cell
    pub fn to_ascii(self) -> char {
        ASCII_BRAILLE[self.0 as usize] as char
    }

    /// Unicode braille pattern of this cell
    pub fn to_unicode(self) -> char {
        char::from_u32(UNICODE_BRAILLE_BASE + self.0 as u32).unwrap_or('\u{2800}')
    }
}

impl fmt::Display for BrailleCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ascii())
    }
}

/// Render ASCII-braille text as Unicode braille patterns.
///
/// Characters outside the table (line breaks, markers) pass through.
pub fn ascii_to_unicode(text: &str) -> String {
    text.chars()
        .map(|ch| BrailleCell::from_ascii(ch).map_or(ch, BrailleCell::to_unicode))
        .collect()
}
