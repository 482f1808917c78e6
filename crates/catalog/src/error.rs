//! Catalog Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Every error is raised before the in-memory collection is replaced, so a
//! failed operation never leaves the catalog half-modified.

use crate::models::{BookId, Status};
use derive_more::{Display, Error};

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required form field was blank after trimming.
    #[display("missing required field: {_0}")]
    MissingField(#[error(not(source))] &'static str),
    /// No record has this id.
    #[display("no book with id {_0}")]
    NotFound(#[error(not(source))] BookId),
    /// No record has this ISBN.
    #[display("No book found with that ISBN/RFID tag")]
    TagNotFound(#[error(not(source))] String),
    /// The requested transition isn't allowed from the book's current status.
    #[display("book {id} is {status}")]
    InvalidStatus {
        /// The book that was targeted.
        id: BookId,
        /// Its status at the time of the request.
        status: Status,
    },
    /// A field value could not be parsed.
    #[display("failed to parse field '{field}', found value: {value}")]
    ParseError {
        /// The field that failed to parse.
        field: &'static str,
        /// The offending input.
        value: String,
    },
    /// Imported or persisted data isn't a JSON array of book records.
    #[display("invalid snapshot: {_0}")]
    InvalidSnapshot(#[error(not(source))] String),
    /// The collection could not be serialized.
    #[display("could not serialize catalog")]
    Serialization,
    /// Reading or writing the persisted slot failed.
    #[display("storage error")]
    Storage,
    /// A due date fell outside the supported calendar range.
    #[display("date out of range")]
    DateOutOfRange,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage)
    }
}
