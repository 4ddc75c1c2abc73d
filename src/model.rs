//! Shared data structures for the application
//!
//! These structs represent the book records that flow between
//! the storage layer and the UI layer. The serialized shape is
//! the stable on-disk format, so field spellings matter here.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which list a book belongs to.
///
/// A book has exactly one status at a time; moving a book from the
/// "to read" list to the "read" list is an update of this field, not
/// a separate record.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BookStatus {
    /// On the reading list, not started or not finished yet
    ToRead,
    /// Finished, with (usually) a note about the takeaways
    Read,
}

/// A single book in the library
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Book {
    /// Display title, non-empty (enforced by the UI layer, not the store)
    pub title: String,
    /// Author, free text, may be empty
    pub author: String,
    /// Free-text note; the UI pre-fills [`READ_NOTE_TEMPLATE`] for read books
    pub note: String,
    /// Which list the book appears in
    pub status: BookStatus,
    /// Unique identifier, immutable once created; all lookups go through it
    pub id: Uuid,
    /// Filename of the cover image inside the covers directory (never a
    /// path). Absent means no cover; a dangling reference is tolerated and
    /// the UI falls back to a placeholder.
    #[serde(rename = "coverFilename", default, skip_serializing_if = "Option::is_none")]
    pub cover_filename: Option<String>,
}

/// Template pre-filled into the note field when a book is marked as read.
pub const READ_NOTE_TEMPLATE: &str = "\
What is the book about?

What are its main takeaways?

What did the book teach me?

What will I change in my life because of it?

Comments:
";

impl Book {
    /// Create a new book with a fresh identifier and no cover.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        note: impl Into<String>,
        status: BookStatus,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            note: note.into(),
            status,
            id: Uuid::new_v4(),
            cover_filename: None,
        }
    }

    pub fn is_read(&self) -> bool {
        self.status == BookStatus::Read
    }
}

/// Filter a collection down to the books with the given status,
/// preserving their relative (insertion) order.
pub fn with_status(books: &[Book], status: BookStatus) -> Vec<Book> {
    books.iter().filter(|b| b.status == status).cloned().collect()
}
