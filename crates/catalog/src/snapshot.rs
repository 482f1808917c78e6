//! Snapshot encoding.
//!
//! The persisted slot, exported backups and imported files all share one
//! shape: a JSON array of [`Book`] records. Parsing is strict about the
//! top-level shape and the per-record invariants, but doesn't care about
//! formatting, so a pretty-printed export reads back exactly.

use crate::error::{ErrorKind, Result};
use crate::models::Book;
use exn::ResultExt;
use serde_json::Value;
use std::collections::HashSet;
use time::Date;

const FILE_PREFIX: &str = "library-backup";

/// Pretty-printed JSON for backup files.
pub fn export(books: &[Book]) -> Result<String> {
    serde_json::to_string_pretty(books).or_raise(|| ErrorKind::Serialization)
}

/// Compact JSON for the persisted slot.
pub(crate) fn encode(books: &[Book]) -> Result<Vec<u8>> {
    serde_json::to_vec(books).or_raise(|| ErrorKind::Serialization)
}

/// Decode a snapshot.
///
/// Fails with [`InvalidSnapshot`](ErrorKind::InvalidSnapshot) if the data
/// isn't JSON, isn't an array, contains something that isn't a book record,
/// repeats an id, or has a due date that disagrees with its status.
pub fn parse(data: impl AsRef<[u8]>) -> Result<Vec<Book>> {
    let value: Value = serde_json::from_slice(data.as_ref())
        .map_err(|e| ErrorKind::InvalidSnapshot(format!("not valid JSON: {e}")))?;
    let Value::Array(items) = value else {
        exn::bail!(ErrorKind::InvalidSnapshot("expected a JSON array".to_string()));
    };
    let mut seen = HashSet::with_capacity(items.len());
    let mut books = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let book: Book = serde_json::from_value(item)
            .map_err(|e| ErrorKind::InvalidSnapshot(format!("record {index} is not a book: {e}")))?;
        if !seen.insert(book.id().clone()) {
            exn::bail!(ErrorKind::InvalidSnapshot(format!("record {index} repeats id {}", book.id())));
        }
        if !book.is_consistent() {
            exn::bail!(ErrorKind::InvalidSnapshot(format!(
                "record {index} is {} but {} a due date",
                book.status(),
                if book.due_date().is_some() { "has" } else { "lacks" },
            )));
        }
        books.push(book);
    }
    Ok(books)
}

/// Default file name for a backup taken on `date`.
pub fn file_name(date: Date) -> String {
    format!("{FILE_PREFIX}-{date}.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::date;

    const TWO_BOOKS: &str = r#"[
        {"id":"1","title":"Dune","author":"Frank Herbert","isbn":"9780441013593","status":"checked-out","dueDate":"2026-10-20","dateAdded":"2026-10-01","overdue":false},
        {"id":"2","title":"Emma","author":"Jane Austen","isbn":"N/A","status":"available","dueDate":null,"dateAdded":"2026-10-02","overdue":false}
    ]"#;

    #[test]
    fn test_parse() {
        let books = parse(TWO_BOOKS).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].due_date(), Some(date!(2026 - 10 - 20)));
        assert_eq!(books[1].isbn(), None);
    }

    #[test]
    fn test_export_parses_back() {
        let books = parse(TWO_BOOKS).unwrap();
        let exported = export(&books).unwrap();
        assert!(exported.contains("\n  {"), "export should be pretty-printed");
        assert_eq!(parse(&exported).unwrap(), books);
        assert_eq!(parse(encode(&books).unwrap()).unwrap(), books);
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse("[]").unwrap().is_empty());
    }

    #[rstest]
    #[case::not_json("{{{", "not valid JSON")]
    #[case::object(r#"{"books":[]}"#, "expected a JSON array")]
    #[case::string(r#""[]""#, "expected a JSON array")]
    #[case::number_item("[1]", "record 0 is not a book")]
    #[case::missing_title(
        r#"[{"id":"1","author":"A","status":"available","dateAdded":"2026-10-01"}]"#,
        "record 0 is not a book"
    )]
    #[case::bad_status(
        r#"[{"id":"1","title":"T","author":"A","status":"lost","dateAdded":"2026-10-01"}]"#,
        "record 0 is not a book"
    )]
    #[case::duplicate_id(
        r#"[{"id":"1","title":"T","author":"A","status":"available","dateAdded":"2026-10-01"},
            {"id":"1","title":"U","author":"B","status":"available","dateAdded":"2026-10-01"}]"#,
        "record 1 repeats id 1"
    )]
    #[case::due_without_checkout(
        r#"[{"id":"1","title":"T","author":"A","status":"available","dueDate":"2026-10-01","dateAdded":"2026-10-01"}]"#,
        "record 0 is available but has a due date"
    )]
    #[case::checkout_without_due(
        r#"[{"id":"1","title":"T","author":"A","status":"checked-out","dateAdded":"2026-10-01"}]"#,
        "record 0 is checked-out but lacks a due date"
    )]
    fn test_parse_rejects(#[case] data: &str, #[case] message: &str) {
        let err = parse(data).unwrap_err();
        match &*err {
            ErrorKind::InvalidSnapshot(reason) => assert!(reason.contains(message), "{reason}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(date!(2026 - 10 - 18)), "library-backup-2026-10-18.json");
    }
}
