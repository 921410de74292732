//! Caller-supplied progress and log sink.
//!
//! Codecs never log through process-wide state. Callers that want progress
//! or diagnostics pass a [`ProgressSink`]; the plain entry points use
//! [`NullSink`].

/// Receives diagnostics and progress from a codec run.
pub trait ProgressSink {
    /// A human-readable diagnostic line.
    fn message(&mut self, _text: &str) {}

    /// `done` out of `total` symbols processed.
    fn progress(&mut self, _done: usize, _total: usize) {}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {}

/// Forwards messages to `tracing` at info level and progress at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn message(&mut self, text: &str) {
        tracing::info!("{text}");
    }

    fn progress(&mut self, done: usize, total: usize) {
        tracing::trace!(done, total, "progress");
    }
}

/// Keeps every message in memory. Useful for tests and reports.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    /// Messages in arrival order.
    pub messages: Vec<String>,
    /// Last `(done, total)` progress reported.
    pub last_progress: Option<(usize, usize)>,
}

impl ProgressSink for CollectingSink {
    fn message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }

    fn progress(&mut self, done: usize, total: usize) {
        self.last_progress = Some((done, total));
    }
}
