//! Typed document settings resolved from the configuration file.

use brailledit_buffer::LineEnding;
use brailledit_config::Config;
use brailledit_keyboard::{ChordKeys, ReleaseModel};
use brailledit_layout::LayoutPolicy;

use crate::DocumentError;

/// Settings a [`crate::Document`] is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    pub layout: LayoutPolicy,
    pub chord_keys: ChordKeys,
    pub release_model: ReleaseModel,
    /// Suppress direct typing on the braille view
    pub braille_entry: bool,
    /// Line ending of new documents and BZY loads
    pub line_ending: LineEnding,
    /// Undo steps kept (0 = unlimited)
    pub history_limit: usize,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            layout: LayoutPolicy::default(),
            chord_keys: ChordKeys::default(),
            release_model: ReleaseModel::platform_default(),
            braille_entry: true,
            line_ending: LineEnding::native(),
            history_limit: 0,
        }
    }
}

impl DocumentOptions {
    /// Resolve the string settings of `config` into typed values.
    pub fn from_config(config: &Config) -> Result<Self, DocumentError> {
        let layout = LayoutPolicy::new(
            config.layout.chars_per_line,
            config.layout.lines_per_page,
            enabled(config.layout.line_margin),
            enabled(config.layout.page_margin),
        )?;

        let chord_keys = config
            .input
            .chord_keys
            .parse()
            .map_err(|message| DocumentError::InvalidOption {
                name: "input.chord_keys",
                message,
            })?;
        let release_model = config
            .input
            .release_model
            .parse()
            .map_err(|message| DocumentError::InvalidOption {
                name: "input.release_model",
                message,
            })?;
        let line_ending = config
            .files
            .line_ending
            .parse()
            .map_err(|message| DocumentError::InvalidOption {
                name: "files.line_ending",
                message,
            })?;

        Ok(Self {
            layout,
            chord_keys,
            release_model,
            braille_entry: config.input.braille_entry,
            line_ending,
            history_limit: config.files.history_limit,
        })
    }
}

/// Zero disables a margin
fn enabled(margin: usize) -> Option<usize> {
    (margin > 0).then_some(margin)
}
