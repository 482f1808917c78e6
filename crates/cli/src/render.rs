//! Plain-text views of catalog records.

use stacks_catalog::Book;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// One book, as shown in listings.
///
/// ```text
/// Dune
///   By Frank Herbert
///   ISBN: 9780441013593
///   Checked Out - OVERDUE!
///   Due: 2026-11-01
///   ID: 1760745600000
/// ```
pub struct BookCard<'a>(pub &'a Book);
impl Display for BookCard<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let book = self.0;
        writeln!(f, "{}", book.title())?;
        writeln!(f, "  By {}", book.author())?;
        if let Some(isbn) = book.isbn() {
            writeln!(f, "  ISBN: {isbn}")?;
        }
        write!(f, "  {}", book.status().label())?;
        if book.is_overdue() {
            f.write_str(" - OVERDUE!")?;
        }
        writeln!(f)?;
        if let Some(due) = book.due_date() {
            writeln!(f, "  Due: {due}")?;
        }
        write!(f, "  ID: {}", book.id())
    }
}

/// A listing followed by its count line.
pub struct BookList<'a>(pub &'a [&'a Book]);
impl Display for BookList<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.0.is_empty() {
            writeln!(f, "No books found matching your criteria.")?;
        }
        for book in self.0 {
            writeln!(f, "{}\n", BookCard(book))?;
        }
        match self.0.len() {
            1 => write!(f, "1 book found"),
            n => write!(f, "{n} books found"),
        }
    }
}

/// Nothing at all when there are no recommendations.
pub struct Recommendations<'a>(pub &'a [&'a Book]);
impl Display for Recommendations<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.0.is_empty() {
            return Ok(());
        }
        write!(f, "Recommended For You")?;
        for book in self.0 {
            write!(f, "\n  {} by {}", book.title(), book.author())?;
            if let Some(isbn) = book.isbn() {
                write!(f, " (ISBN: {isbn})")?;
            }
        }
        Ok(())
    }
}
