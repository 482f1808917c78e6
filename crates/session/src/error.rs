//! Session Error Types
//!
//! Every variant's `Display` is the message shown to the person at the
//! keyboard, so the front end can print errors as they are.

use derive_more::{Display, Error};

/// A session error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("Please fill in all fields")]
    MissingFields,
    #[display("Passwords do not match")]
    PasswordMismatch,
    #[display("Password must be at least {_0} characters")]
    PasswordTooShort(#[error(not(source))] usize),
    /// The phone number lacks the country prefix or has the wrong length.
    #[display("Please enter a valid number starting with {_0}")]
    InvalidPhone(#[error(not(source))] String),
    /// The identity service or profile store refused the request.
    #[display("{_0}")]
    Service(#[error(not(source))] AuthFailure),
    /// Phone sign-in needs a telecom integration that doesn't exist.
    #[display("USSD login would require a USSD gateway integration")]
    ChannelUnavailable,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Service(AuthFailure::Other))
    }
}

/// Failure codes reported by the identity service, as far as they are
/// recognized.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthFailure {
    #[display("Email is already registered")]
    EmailInUse,
    #[display("Invalid email address")]
    InvalidEmail,
    #[display("Password is too weak")]
    WeakPassword,
    #[display("User not found")]
    UserNotFound,
    #[display("Incorrect password")]
    WrongPassword,
    /// Any code not listed above.
    #[display("Login failed. Please try again.")]
    Other,
}

impl AuthFailure {
    const PREFIX: &'static str = "auth/";

    /// Maps a service code, with or without the `auth/` prefix.
    pub fn from_code(code: &str) -> Self {
        match code.strip_prefix(Self::PREFIX).unwrap_or(code) {
            "email-already-in-use" => Self::EmailInUse,
            "invalid-email" => Self::InvalidEmail,
            "weak-password" => Self::WeakPassword,
            "user-not-found" => Self::UserNotFound,
            "wrong-password" => Self::WrongPassword,
            _ => Self::Other,
        }
    }
}
