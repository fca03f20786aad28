//! Braille document editing engine.
//!
//! A [`Document`] ties together the shared text and its change journal, the
//! page layout, the chord decoder and two views (braille and ASCII) with
//! their own caret and scroll state. Bell signals are delivered to a
//! [`SignalSink`].

mod command;
mod document;
mod error;
mod options;
mod render;
mod signal;
mod view;

pub use command::EditCommand;
pub use document::{Document, KeyVerdict};
pub use error::DocumentError;
pub use options::DocumentOptions;
pub use render::LineInfo;
pub use signal::{NullSink, Signal, SignalSink};
pub use view::{ViewKind, ViewState};

// Re-export the pieces callers need alongside a document
pub use brailledit_buffer::{LineEnding, PARAGRAPH_END};
pub use brailledit_format::FileFormat;
pub use brailledit_layout::LayoutPolicy;
