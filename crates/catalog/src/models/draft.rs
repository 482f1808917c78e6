use super::NO_ISBN;
use crate::error::{ErrorKind, Result};

/// User-entered book details, as typed into an add or edit form.
///
/// Nothing is trimmed or checked until the draft reaches the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
}
impl Draft {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self { title: title.into(), author: author.into(), isbn: None }
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    /// Trims every field and rejects drafts without a title or author.
    /// A blank ISBN, or one typed as [`NO_ISBN`], becomes `None`.
    pub(crate) fn validate(self) -> Result<Self> {
        let title = self.title.trim();
        let author = self.author.trim();
        if title.is_empty() {
            exn::bail!(ErrorKind::MissingField("title"));
        }
        if author.is_empty() {
            exn::bail!(ErrorKind::MissingField("author"));
        }
        let isbn = self.isbn.as_deref()
            .map(str::trim)
            .filter(|isbn| !isbn.is_empty() && *isbn != NO_ISBN)
            .map(str::to_string);
        Ok(Self { title: title.to_string(), author: author.to_string(), isbn })
    }
}
