//! Persistence: the preference file, the book store and cover images.

pub mod books;
pub mod covers;
pub mod error;
pub mod prefs;

pub use books::{BookStore, CleanupReport, STORAGE_KEY};
pub use error::StoreError;
