//! Bell signals raised by caret movement.
//!
//! The engine only reports that a margin was reached; whether a bell is
//! sounded is up to the sink.

use std::sync::mpsc::Sender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Caret advanced onto the line margin column
    LineMargin,
    /// New line started two lines before the page margin
    PageMargin,
}

/// Receiver of signals, called synchronously during the triggering edit.
pub trait SignalSink {
    fn signal(&mut self, signal: Signal);
}

/// Sink that drops every signal
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SignalSink for NullSink {
    fn signal(&mut self, _signal: Signal) {}
}

impl SignalSink for Sender<Signal> {
    fn signal(&mut self, signal: Signal) {
        // A closed receiver means nobody listens for bells
        let _ = self.send(signal);
    }
}
