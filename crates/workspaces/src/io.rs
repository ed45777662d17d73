//! Ready-made [`Io`] collaborators.

use crate::core::traits::Io;
use std::cell::RefCell;

/// Forwards status lines to `tracing` under the `composer_workspaces::io` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingIo;

impl Io for TracingIo {
    fn write(&self, message: &str) {
        tracing::info!(target: "composer_workspaces::io", "{message}");
    }

    fn write_error(&self, message: &str) {
        tracing::warn!(target: "composer_workspaces::io", "{message}");
    }
}

/// Which channel a recorded line went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// [`Io::write`]
    Output,
    /// [`Io::write_error`]
    Error,
}

/// Records every line in memory.
#[derive(Debug, Default)]
pub struct MemoryIo {
    lines: RefCell<Vec<(Channel, String)>>,
}

impl MemoryIo {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded lines in order.
    #[must_use]
    pub fn lines(&self) -> Vec<(Channel, String)> {
        self.lines.borrow().clone()
    }

    /// Lines written through [`Io::write`].
    #[must_use]
    pub fn output(&self) -> Vec<String> {
        self.filtered(Channel::Output)
    }

    /// Lines written through [`Io::write_error`].
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.filtered(Channel::Error)
    }

    fn filtered(&self, channel: Channel) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, line)| line.clone())
            .collect()
    }
}

impl Io for MemoryIo {
    fn write(&self, message: &str) {
        self.lines
            .borrow_mut()
            .push((Channel::Output, message.to_string()));
    }

    fn write_error(&self, message: &str) {
        self.lines
            .borrow_mut()
            .push((Channel::Error, message.to_string()));
    }
}
