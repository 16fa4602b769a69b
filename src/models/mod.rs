//! Data models for the library catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookDetails, BookDraft, BookListEntry, FieldError, NewBook, RawBookForm};
pub use book_instance::{BookInstance, BookInstanceStatus};
pub use genre::{Genre, GenreChoice};

use uuid::Uuid;

/// Parse a submitted reference. Any spelling `Uuid` accepts names the same id.
pub fn parse_ref(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value.trim()).ok()
}
