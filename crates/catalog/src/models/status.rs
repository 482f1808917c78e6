use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use super::sanitize;
use crate::error::{Error, ErrorKind};
use serde::{Deserialize, Serialize};

/// Circulation status of a book.
///
/// The only transitions are `Available -> CheckedOut` (checkout) and
/// `CheckedOut -> Available` (return).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// On the shelf
    Available,
    /// Lent out, with a due date
    CheckedOut,
}
impl Status {
    /// Returns the serialized form of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Available => "available",
            Status::CheckedOut => "checked-out",
        }
    }

    /// Returns the human-readable label of the status.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Available => "Available",
            Status::CheckedOut => "Checked Out",
        }
    }
}
impl FromStr for Status {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match sanitize(s).as_str() {
            "available" | "in" => Self::Available,
            "checkedout" | "out" => Self::CheckedOut,
            _ => exn::bail!(ErrorKind::ParseError {
                field: "status",
                value: s.to_string(),
            }),
        })
    }
}
impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Selection applied by [`Catalog::filter_by_status`](crate::Catalog::filter_by_status).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every record
    #[default]
    All,
    /// Records whose cached overdue flag is set
    Overdue,
    /// Records with exactly this status
    Status(Status),
}
impl StatusFilter {
    pub fn matches(&self, book: &super::Book) -> bool {
        match self {
            Self::All => true,
            Self::Overdue => book.is_overdue(),
            Self::Status(status) => book.status() == *status,
        }
    }
}
impl From<Status> for StatusFilter {
    fn from(status: Status) -> Self {
        Self::Status(status)
    }
}
impl FromStr for StatusFilter {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match sanitize(s).as_str() {
            "all" => Ok(Self::All),
            "overdue" => Ok(Self::Overdue),
            _ => s.parse().map(Self::Status),
        }
    }
}
impl Display for StatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::All => f.write_str("all"),
            Self::Overdue => f.write_str("overdue"),
            Self::Status(status) => write!(f, "{status}"),
        }
    }
}
