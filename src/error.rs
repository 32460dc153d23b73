//! Error types for one refresh cycle.

use std::fmt;

/// Errors that can occur while producing one rendered table.
///
/// In interactive mode any of these is shown in place of the table and the
/// loop continues; in one-shot (piped) mode they are fatal.
#[derive(Debug, Clone)]
pub enum Error {
    /// The status text is not parseable as the expected document.
    MalformedSnapshot(String),
    /// The external status command failed or timed out.
    /// `output` carries whatever the command wrote before failing.
    FetchFailure { message: String, output: String },
    /// A process entry's address lacks the `host:port` separator.
    MalformedAddress(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedSnapshot(msg) => write!(f, "malformed status json: {}", msg),
            Error::FetchFailure { message, .. } => write!(f, "status command failed: {}", message),
            Error::MalformedAddress(addr) => write!(f, "malformed process address: {}", addr),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Partial output captured from a failed fetch, if any.
    pub fn partial_output(&self) -> Option<&str> {
        match self {
            Error::FetchFailure { output, .. } if !output.is_empty() => Some(output),
            _ => None,
        }
    }
}
