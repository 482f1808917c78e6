//! Typed boundary between a presentation layer and the catalog.
//!
//! A front end turns user actions into [`Command`]s, answers [`Prompt`]s
//! through its own [`Confirm`] implementation, and shows the resulting
//! [`Outcome`] (whose `Display` is the message meant for the user).

use crate::models::{Book, BookId, Draft};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A mutating request against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Draft),
    Update { id: BookId, draft: Draft },
    Checkout(BookId),
    Return(BookId),
    Delete(BookId),
    Sweep,
    /// Raw snapshot bytes, as read from a file.
    Import(Vec<u8>),
}

/// What a successfully executed [`Command`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(Book),
    Updated(Book),
    CheckedOut(Book),
    Returned(Book),
    Deleted(Book),
    Swept { overdue: usize },
    Imported { count: usize },
    /// The user said no; nothing changed.
    Declined,
}
impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Added(book) => write!(f, "\"{}\" has been added to the library!", book.title()),
            Self::Updated(_) => f.write_str("Book details updated successfully!"),
            Self::CheckedOut(book) => match book.due_date() {
                Some(due) => write!(f, "\"{}\" has been checked out. Due date: {due}", book.title()),
                None => write!(f, "\"{}\" has been checked out.", book.title()),
            },
            Self::Returned(book) => write!(f, "\"{}\" has been returned. Thank you!", book.title()),
            Self::Deleted(book) => write!(f, "\"{}\" has been removed from the library.", book.title()),
            Self::Swept { overdue: 0 } => f.write_str("No overdue books."),
            Self::Swept { overdue: 1 } => f.write_str("Found 1 overdue book."),
            Self::Swept { overdue } => write!(f, "Found {overdue} overdue books."),
            Self::Imported { count } => write!(f, "Library data imported successfully! ({count} books)"),
            Self::Declined => f.write_str("Cancelled; nothing was changed."),
        }
    }
}

/// Result of an operation that asks for confirmation first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change<T> {
    Applied(T),
    Declined,
}
impl<T> Change<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Declined => None,
        }
    }
}

/// A question put to the user before a destructive or state-changing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt<'a> {
    Checkout { title: &'a str },
    Return { title: &'a str },
    Delete { title: &'a str },
    Import { count: usize },
}
impl Display for Prompt<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Checkout { title } => write!(f, "Check out \"{title}\"?"),
            Self::Return { title } => write!(f, "Return \"{title}\"?"),
            Self::Delete { title } => write!(f, "Permanently delete \"{title}\" from the library?"),
            Self::Import { count } => write!(f, "Import {count} books? This will replace current data."),
        }
    }
}

/// Answers [`Prompt`]s. Implemented by whatever talks to the user.
pub trait Confirm {
    fn confirm(&self, prompt: &Prompt<'_>) -> bool;
}

/// Answers every prompt the same way, without asking anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoConfirm(pub bool);
impl Confirm for AutoConfirm {
    fn confirm(&self, prompt: &Prompt<'_>) -> bool {
        tracing::debug!(%prompt, answer = self.0, "Answering prompt automatically");
        self.0
    }
}
