//! booktrack: a personal book tracker.
//!
//! Books live on one of two lists ("to read" / "read") with a
//! free-text note and an optional cover image. The whole collection is
//! persisted as a single JSON blob under a versioned key in a local
//! preference file; cover images live in a covers directory kept
//! consistent with the collection by a sweep after every save.

pub mod library;
pub mod model;
pub mod store;

pub use library::Library;
pub use model::{Book, BookStatus, READ_NOTE_TEMPLATE};
pub use store::{BookStore, CleanupReport, StoreError};
