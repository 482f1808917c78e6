mod book;
mod draft;
mod id;
mod status;

pub use self::book::{Book, NO_ISBN};
pub use self::draft::Draft;
pub use self::id::BookId;
pub use self::status::{Status, StatusFilter};

fn sanitize(s: impl AsRef<str>) -> String {
    s.as_ref().trim().to_lowercase().replace('-', "").replace('_', "").replace(' ', "")
}
