//! Read-only views over the collection: search, status filter, tag scan
//! and recommendations.
//!
//! All of these work on a slice in collection order and never reorder it.

use crate::error::{ErrorKind, Result};
use crate::models::{Book, Status, StatusFilter};
use std::collections::HashSet;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Below this many records no recommendations are made at all.
const RECOMMEND_MIN_BOOKS: usize = 3;
/// How many checked-out records seed the author set.
const RECOMMEND_SEED_BOOKS: usize = 3;
const RECOMMEND_LIMIT: usize = 5;

/// Case-insensitive substring search over title, author and ISBN, where a
/// missing ISBN reads as `N/A`. An empty query matches everything.
pub fn search<'a>(books: &'a [Book], query: &str) -> impl Iterator<Item = &'a Book> + use<'a> {
    let needle = query.to_lowercase();
    books.iter().filter(move |book| needle.is_empty() || book.matches(&needle))
}

pub fn filter_by_status(books: &[Book], filter: StatusFilter) -> impl Iterator<Item = &Book> {
    books.iter().filter(move |book| filter.matches(book))
}

/// Finds the record whose ISBN equals the scanned tag exactly.
pub fn scan_tag<'a>(books: &'a [Book], tag: &str) -> Result<&'a Book> {
    let tag = tag.trim();
    if tag.is_empty() {
        exn::bail!(ErrorKind::MissingField("isbn"));
    }
    match books.iter().find(|book| book.isbn() == Some(tag)) {
        Some(book) => Ok(book),
        None => exn::bail!(ErrorKind::TagNotFound(tag.to_string())),
    }
}

/// "Readers of what's checked out might also like..." heuristic.
///
/// Seeds an author set from the first three checked-out records, then picks,
/// in collection order, up to five records that share one of those authors
/// or are available and weren't a seed. Not a ranking.
pub fn recommend(books: &[Book]) -> Vec<&Book> {
    if books.len() < RECOMMEND_MIN_BOOKS {
        return Vec::new();
    }
    let seeds: Vec<&Book> =
        books.iter().filter(|book| book.status() == Status::CheckedOut).take(RECOMMEND_SEED_BOOKS).collect();
    if seeds.is_empty() {
        return Vec::new();
    }
    let authors: HashSet<&str> = seeds.iter().map(|book| book.author()).collect();
    let is_seed = |book: &Book| seeds.iter().any(|seed| seed.id() == book.id());
    books
        .iter()
        .filter(|book| authors.contains(book.author()) || (book.is_available() && !is_seed(book)))
        .take(RECOMMEND_LIMIT)
        .collect()
}

/// What the scanner shows for a found tag.
///
/// ```text
/// Title: Dune
/// Author: Frank Herbert
/// Status: Checked Out (Due: 2026-11-01) - OVERDUE!
/// ```
pub struct ScanReport<'a>(pub &'a Book);
impl ScanReport<'_> {
    pub fn status_line(&self) -> String {
        let book = self.0;
        let mut line = match (book.status(), book.due_date()) {
            (Status::CheckedOut, Some(due)) => format!("Checked Out (Due: {due})"),
            (Status::CheckedOut, None) => "Checked Out".to_string(),
            (Status::Available, _) => "Available for checkout".to_string(),
        };
        if book.is_overdue() {
            line.push_str(" - OVERDUE!");
        }
        line
    }
}
impl Display for ScanReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "Title: {}", self.0.title())?;
        writeln!(f, "Author: {}", self.0.author())?;
        write!(f, "Status: {}", self.status_line())
    }
}
