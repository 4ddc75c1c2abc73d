//! The Library ties the UI-facing flows together: add, edit, delete
//! and mark-as-read are all load → merge → save over the [`BookStore`].
//!
//! The store itself never merges; callers hand it the complete desired
//! collection. This type is the one place the find-by-id-or-append
//! logic lives.

use uuid::Uuid;

use crate::model::{with_status, Book, BookStatus, READ_NOTE_TEMPLATE};
use crate::store::{BookStore, CleanupReport, StoreError};

/// The book collection plus the operations the app performs on it.
#[derive(Debug)]
pub struct Library {
    store: BookStore,
}

impl Library {
    pub fn new(store: BookStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &BookStore {
        &self.store
    }

    /// The whole collection, insertion order.
    pub fn books(&self) -> Result<Vec<Book>, StoreError> {
        self.store.load()
    }

    /// The books on one of the two lists, in insertion order.
    pub fn list(&self, status: BookStatus) -> Result<Vec<Book>, StoreError> {
        Ok(with_status(&self.books()?, status))
    }

    pub fn find(&self, id: Uuid) -> Result<Option<Book>, StoreError> {
        Ok(self.books()?.into_iter().find(|b| b.id == id))
    }

    /// Insert `book`, or replace the record with the same id in place.
    ///
    /// An update keeps the record at its existing index; a new book is
    /// appended. Either way the whole collection is rewritten and the
    /// cover sweep runs.
    pub fn upsert(&self, book: Book) -> Result<CleanupReport, StoreError> {
        let mut books = self.books()?;
        match books.iter_mut().find(|b| b.id == book.id) {
            Some(existing) => *existing = book,
            None => books.push(book),
        }
        self.store.save(&books)
    }

    /// Remove the book with `id`. Returns false (without writing) when
    /// no such book exists. The sweep after the save deletes the
    /// removed book's cover file, if it had one.
    pub fn remove(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut books = self.books()?;
        let before = books.len();
        books.retain(|b| b.id != id);
        if books.len() == before {
            return Ok(false);
        }
        self.store.save(&books)?;
        Ok(true)
    }

    /// Move a book to the "read" list, keeping title, author and cover.
    ///
    /// `note` replaces the book's note; when absent, the note template
    /// is filled in for the user to complete later, matching the
    /// pre-filled form of the add-read flow. Returns the updated book,
    /// or `None` when `id` is unknown.
    pub fn mark_read(&self, id: Uuid, note: Option<&str>) -> Result<Option<Book>, StoreError> {
        let mut books = self.books()?;
        let Some(book) = books.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };

        book.status = BookStatus::Read;
        book.note = note.unwrap_or(READ_NOTE_TEMPLATE).to_string();
        let updated = book.clone();

        self.store.save(&books)?;
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::STORAGE_KEY;
    use tempfile::{tempdir, TempDir};

    fn test_library(dir: &TempDir) -> Library {
        Library::new(BookStore::new(
            dir.path().join("prefs.json"),
            STORAGE_KEY,
            dir.path().join("covers"),
        ))
    }

    #[test]
    fn test_upsert_appends_new_books() {
        let dir = tempdir().unwrap();
        let library = test_library(&dir);

        library.upsert(Book::new("first", "", "", BookStatus::ToRead)).unwrap();
        library.upsert(Book::new("second", "", "", BookStatus::ToRead)).unwrap();

        let books = library.books().unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title, "first");
        assert_eq!(books[1].title, "second");
    }

    #[test]
    fn test_upsert_updates_in_place() {
        let dir = tempdir().unwrap();
        let library = test_library(&dir);

        let a = Book::new("a", "", "", BookStatus::ToRead);
        let b = Book::new("b", "", "", BookStatus::ToRead);
        let c = Book::new("c", "", "", BookStatus::ToRead);
        for book in [&a, &b, &c] {
            library.upsert(book.clone()).unwrap();
        }

        let mut edited = b.clone();
        edited.title = "b, revised".into();
        edited.author = "somebody".into();
        library.upsert(edited).unwrap();

        let books = library.books().unwrap();
        // Same length, same neighbors, updated record at its old index.
        assert_eq!(books.len(), 3);
        assert_eq!(books[0].id, a.id);
        assert_eq!(books[1].id, b.id);
        assert_eq!(books[1].title, "b, revised");
        assert_eq!(books[2].id, c.id);
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().unwrap();
        let library = test_library(&dir);

        let book = Book::new("doomed", "", "", BookStatus::ToRead);
        library.upsert(book.clone()).unwrap();

        assert!(library.remove(book.id).unwrap());
        assert!(library.books().unwrap().is_empty());

        // Removing an unknown id reports false and writes nothing.
        assert!(!library.remove(book.id).unwrap());
    }

    #[test]
    fn test_remove_sweeps_the_orphaned_cover() {
        let dir = tempdir().unwrap();
        let library = test_library(&dir);
        let store = library.store();

        std::fs::create_dir_all(store.covers_dir()).unwrap();
        std::fs::write(store.cover_path("cover_x.jpg"), b"jpeg").unwrap();

        let mut book = Book::new("covered", "", "", BookStatus::ToRead);
        book.cover_filename = Some("cover_x.jpg".into());
        library.upsert(book.clone()).unwrap();
        assert!(store.cover_path("cover_x.jpg").exists());

        library.remove(book.id).unwrap();
        assert!(!store.cover_path("cover_x.jpg").exists());
    }

    #[test]
    fn test_mark_read_keeps_identity_and_cover() {
        let dir = tempdir().unwrap();
        let library = test_library(&dir);

        let mut book = Book::new("finished", "author", "old note", BookStatus::ToRead);
        book.cover_filename = Some("cover_y.jpg".into());
        library.upsert(book.clone()).unwrap();

        let updated = library.mark_read(book.id, None).unwrap().unwrap();
        assert_eq!(updated.id, book.id);
        assert_eq!(updated.status, BookStatus::Read);
        assert_eq!(updated.note, READ_NOTE_TEMPLATE);
        assert_eq!(updated.cover_filename.as_deref(), Some("cover_y.jpg"));

        assert!(library.list(BookStatus::ToRead).unwrap().is_empty());
        assert_eq!(library.list(BookStatus::Read).unwrap().len(), 1);
    }

    #[test]
    fn test_mark_read_with_explicit_note() {
        let dir = tempdir().unwrap();
        let library = test_library(&dir);

        let book = Book::new("finished", "", "", BookStatus::ToRead);
        library.upsert(book.clone()).unwrap();

        let updated = library.mark_read(book.id, Some("great")).unwrap().unwrap();
        assert_eq!(updated.note, "great");
    }

    #[test]
    fn test_mark_read_unknown_id() {
        let dir = tempdir().unwrap();
        let library = test_library(&dir);

        assert!(library.mark_read(Uuid::new_v4(), None).unwrap().is_none());
    }
}
