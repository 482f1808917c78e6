//! CLI Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A CLI error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for CLI commands.
pub type Result<T> = std::result::Result<T, Error>;

/// What went wrong, worded for the terminal.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("{_0}")]
    Config(#[error(not(source))] stacks_config::error::ErrorKind),
    #[display("{_0}")]
    Catalog(#[error(not(source))] stacks_catalog::error::ErrorKind),
    /// The storage directory can't be used.
    #[display("could not open storage at {}", _0.display())]
    StorageRoot(#[error(not(source))] PathBuf),
    #[display("could not read or write {}", _0.display())]
    File(#[error(not(source))] PathBuf),
    #[display("could not write output")]
    Output,
    #[display("could not listen for Ctrl-C")]
    Signal,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Catalog(kind) => kind.is_retryable(),
            Self::File(_) | Self::Output => true,
            _ => false,
        }
    }
}

/// Raise a catalog error as a CLI error, keeping its message.
pub(crate) fn catalog<T>(result: stacks_catalog::error::Result<T>) -> Result<T> {
    result.map_err(|err| {
        let kind = (*err).clone();
        err.raise(ErrorKind::Catalog(kind))
    })
}

/// Raise a configuration error as a CLI error, keeping its message.
pub(crate) fn config<T>(result: stacks_config::error::Result<T>) -> Result<T> {
    result.map_err(|err| {
        let kind = (*err).clone();
        err.raise(ErrorKind::Config(kind))
    })
}
