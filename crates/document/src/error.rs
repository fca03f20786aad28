use brailledit_buffer::BufferError;
use brailledit_format::CodecError;
use brailledit_layout::LayoutError;
use thiserror::Error;

/// Errors surfaced by [`crate::Document`] operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Configuration value that cannot be resolved
    #[error("invalid {name}: {message}")]
    InvalidOption { name: &'static str, message: String },
}
