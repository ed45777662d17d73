//! Status lines printed to the terminal

use composer_workspaces::Io;

/// Prints [`Io`] lines. Regular lines go to stdout unless stdout carries
/// JSON, in which case everything goes to stderr.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleIo {
    stdout_reserved: bool,
}

impl ConsoleIo {
    pub const fn new(stdout_reserved: bool) -> Self {
        Self { stdout_reserved }
    }
}

#[allow(clippy::print_stdout, clippy::print_stderr)]
impl Io for ConsoleIo {
    fn write(&self, message: &str) {
        tracing::debug!(target: "composer_workspaces::io", "{message}");
        if self.stdout_reserved {
            eprintln!("{message}");
        } else {
            println!("{message}");
        }
    }

    fn write_error(&self, message: &str) {
        tracing::debug!(target: "composer_workspaces::io", error = true, "{message}");
        eprintln!("{message}");
    }
}
