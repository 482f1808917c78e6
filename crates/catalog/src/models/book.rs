use super::{BookId, Draft, Status};
use serde::{Deserialize, Serialize};
use time::Date;

/// Stored in place of a missing ISBN.
pub const NO_ISBN: &str = "N/A";

/// A single catalog record.
///
/// Checkout state lives directly on the record: `due_date` is set exactly
/// while the book is checked out. `overdue` is a cache that only the overdue
/// sweep writes; it is never authoritative on its own.
///
/// The serialized shape (camelCase keys, `"N/A"` for a missing ISBN,
/// `YYYY-MM-DD` dates) is shared by the persisted slot and snapshot files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    id: BookId,
    title: String,
    author: String,
    #[serde(default, with = "isbn_sentinel")]
    isbn: Option<String>,
    status: Status,
    due_date: Option<Date>,
    date_added: Date,
    #[serde(default)]
    overdue: bool,
}
impl Book {
    pub(crate) fn new(id: BookId, draft: Draft, today: Date) -> Self {
        Self {
            id,
            title: draft.title,
            author: draft.author,
            isbn: draft.isbn,
            status: Status::Available,
            due_date: None,
            date_added: today,
            overdue: false,
        }
    }

    pub fn id(&self) -> &BookId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// The ISBN, or `None` where the stored form is [`NO_ISBN`].
    pub fn isbn(&self) -> Option<&str> {
        self.isbn.as_deref()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn due_date(&self) -> Option<Date> {
        self.due_date
    }

    pub fn date_added(&self) -> Date {
        self.date_added
    }

    /// Cached result of the last overdue sweep.
    pub fn is_overdue(&self) -> bool {
        self.overdue
    }

    pub fn is_available(&self) -> bool {
        self.status == Status::Available
    }

    /// Whether the book is overdue on `today`, computed from status and due
    /// date rather than the cached flag.
    pub fn is_overdue_on(&self, today: Date) -> bool {
        self.status == Status::CheckedOut && self.due_date.is_some_and(|due| due < today)
    }

    /// Case-insensitive substring match on title, author and the stored ISBN
    /// (so a book without one matches `"n/a"`). `needle` must already be
    /// lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.author.to_lowercase().contains(needle)
            || self.isbn.as_deref().unwrap_or(NO_ISBN).to_lowercase().contains(needle)
    }

    /// A due date is present if and only if the book is checked out.
    pub(crate) fn is_consistent(&self) -> bool {
        self.due_date.is_some() == (self.status == Status::CheckedOut)
    }

    pub(crate) fn edit(&mut self, draft: Draft) {
        self.title = draft.title;
        self.author = draft.author;
        self.isbn = draft.isbn;
    }

    pub(crate) fn check_out(&mut self, due: Date) {
        self.status = Status::CheckedOut;
        self.due_date = Some(due);
        self.overdue = false;
    }

    pub(crate) fn check_in(&mut self) {
        self.status = Status::Available;
        self.due_date = None;
        self.overdue = false;
    }

    /// Recompute the overdue cache; returns the new value.
    pub(crate) fn refresh_overdue(&mut self, today: Date) -> bool {
        self.overdue = self.is_overdue_on(today);
        self.overdue
    }
}

mod isbn_sentinel {
    use super::NO_ISBN;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(isbn: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(isbn.as_deref().unwrap_or(NO_ISBN))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|isbn| !isbn.is_empty() && isbn != NO_ISBN))
    }
}
