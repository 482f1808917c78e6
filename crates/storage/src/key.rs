//! Slot key validation.
//!
//! Local backends turn a slot key straight into a file name, so keys are
//! restricted to a conservative character set that can never name a
//! directory, a hidden file, or escape the storage root.

use crate::error::{Error, ErrorKind, Result};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

const MAX_KEY_LENGTH: usize = 128;

/// A validated slot name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey(String);
impl SlotKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl AsRef<str> for SlotKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
impl FromStr for SlotKey {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        validate(s)
    }
}
impl Display for SlotKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Validates a slot key.
///
/// Accepts ASCII letters, digits, `-`, `_` and `.`, up to 128 bytes, not
/// starting with a dot.
///
/// # Examples
///
/// ```
/// use stacks_storage::validate_key;
/// assert!(validate_key("library-books").is_ok());
/// assert!(validate_key("backup_2026.10").is_ok());
/// assert!(validate_key("../etc/passwd").is_err());
/// assert!(validate_key(".hidden").is_err());
/// assert!(validate_key("").is_err());
/// ```
pub fn validate(key: impl AsRef<str>) -> Result<SlotKey> {
    let key = key.as_ref();
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.');
    if key.is_empty() || key.len() > MAX_KEY_LENGTH || key.starts_with('.') || !key.chars().all(allowed) {
        exn::bail!(ErrorKind::InvalidKey(key.to_string()));
    }
    Ok(SlotKey(key.to_string()))
}
