//! Configuration structures for brailledit settings.

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Application configuration with nested sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Page geometry and bell margins
    #[serde(default)]
    pub layout: LayoutSettings,

    /// Chord and keystroke handling
    #[serde(default)]
    pub input: InputSettings,

    /// Load/save behavior
    #[serde(default)]
    pub files: FileSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Layout settings for new documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Braille cells per embossed line
    #[serde(default = "default_chars_per_line")]
    pub chars_per_line: usize,

    /// Embossed lines per page
    #[serde(default = "default_lines_per_page")]
    pub lines_per_page: usize,

    /// Column that rings the line bell (0 = off)
    #[serde(default = "default_line_margin")]
    pub line_margin: usize,

    /// Page line the page bell is aimed at (0 = off)
    #[serde(default = "default_page_margin")]
    pub page_margin: usize,
}

/// Input settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSettings {
    /// Keys for dots 1 to 6, in order
    #[serde(default = "default_chord_keys")]
    pub chord_keys: String,

    /// Key release model (auto, per-key, all-at-once)
    #[serde(default = "default_release_model")]
    pub release_model: String,

    /// Suppress direct typing of printable characters on the braille view
    #[serde(default = "default_braille_entry")]
    pub braille_entry: bool,
}

/// File settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Line ending for new documents and BZY files (native, lf, crlf)
    #[serde(default = "default_line_ending")]
    pub line_ending: String,

    /// Maximum undo steps (0 = unlimited)
    #[serde(default)]
    pub history_limit: usize,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log file path (optional)
    #[serde(default)]
    pub file_path: Option<String>,

    /// Minimum log level (debug, info, warn, error)
    #[serde(default = "default_min_level")]
    pub min_level: String,

    /// Entries kept in memory
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

// Default value functions for serde
fn default_chars_per_line() -> usize {
    defaults::CHARS_PER_LINE
}

fn default_lines_per_page() -> usize {
    defaults::LINES_PER_PAGE
}

fn default_line_margin() -> usize {
    defaults::LINE_MARGIN
}

fn default_page_margin() -> usize {
    defaults::PAGE_MARGIN
}

fn default_chord_keys() -> String {
    defaults::CHORD_KEYS.to_string()
}

fn default_release_model() -> String {
    defaults::RELEASE_MODEL.to_string()
}

fn default_braille_entry() -> bool {
    defaults::BRAILLE_ENTRY
}

fn default_line_ending() -> String {
    defaults::LINE_ENDING.to_string()
}

fn default_min_level() -> String {
    defaults::MIN_LOG_LEVEL.to_string()
}

fn default_max_entries() -> usize {
    defaults::MAX_LOG_ENTRIES
}

// Default implementations
impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            chars_per_line: default_chars_per_line(),
            lines_per_page: default_lines_per_page(),
            line_margin: default_line_margin(),
            page_margin: default_page_margin(),
        }
    }
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            chord_keys: default_chord_keys(),
            release_model: default_release_model(),
            braille_entry: default_braille_entry(),
        }
    }
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            line_ending: default_line_ending(),
            history_limit: 0,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file_path: None,
            min_level: default_min_level(),
            max_entries: default_max_entries(),
        }
    }
}
