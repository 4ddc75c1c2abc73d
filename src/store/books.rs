//! The book store: the single source of truth for the collection.
//!
//! Every read loads the whole collection fresh from the preference
//! blob and every write rewrites it whole; there is no incremental
//! persistence. After each successful save the store sweeps the covers
//! directory and deletes any image no record references.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::StoreError;
use super::prefs::Prefs;
use crate::model::Book;

/// Versioned key the book blob lives under in the preference file.
pub const STORAGE_KEY: &str = "books_storage_v1";

/// What the post-save cleanup sweep did.
///
/// Cleanup is best-effort: a file that could not be deleted is reported
/// here and picked up again by the sweep after the next save.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    /// Cover filenames deleted because no saved record references them.
    pub removed: Vec<String>,
    /// Cover filenames that should have been deleted but could not be.
    pub failed: Vec<String>,
}

/// Persistence for the book collection plus the covers directory it
/// keeps consistent.
///
/// The store is constructed explicitly by the composition root with its
/// preference file, storage key and covers directory; tests point it at
/// a temp directory and nothing else changes.
#[derive(Debug)]
pub struct BookStore {
    prefs: Prefs,
    storage_key: String,
    covers_dir: PathBuf,
}

impl BookStore {
    pub fn new(
        prefs_path: impl Into<PathBuf>,
        storage_key: impl Into<String>,
        covers_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            prefs: Prefs::new(prefs_path),
            storage_key: storage_key.into(),
            covers_dir: covers_dir.into(),
        }
    }

    /// Open a store under the platform data directory, with the
    /// standard key and layout:
    ///
    /// - Linux: ~/.local/share/booktrack/{prefs.json, covers/}
    /// - macOS: ~/Library/Application Support/booktrack/{prefs.json, covers/}
    /// - Windows: %APPDATA%\booktrack\{prefs.json, covers\}
    pub fn open_default() -> Result<Self, StoreError> {
        let mut base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| {
                StoreError::io(
                    "<data dir>",
                    std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "could not determine user data directory",
                    ),
                )
            })?;
        base.push("booktrack");

        Ok(Self::new(base.join("prefs.json"), STORAGE_KEY, base.join("covers")))
    }

    /// Directory holding cover image files, referenced by filename from
    /// book records.
    pub fn covers_dir(&self) -> &Path {
        &self.covers_dir
    }

    /// Full path of a cover file, given the filename stored on a record.
    pub fn cover_path(&self, filename: &str) -> PathBuf {
        self.covers_dir.join(filename)
    }

    /// Load the whole collection, in the order it was last saved.
    ///
    /// An absent blob is an empty collection, not an error. A blob that
    /// exists but does not decode is [`StoreError::Corrupt`]; use
    /// [`load_or_empty`](Self::load_or_empty) for the degrade-to-empty
    /// behavior.
    pub fn load(&self) -> Result<Vec<Book>, StoreError> {
        match self.prefs.value(&self.storage_key)? {
            Some(blob) => serde_json::from_value(blob).map_err(StoreError::Corrupt),
            None => Ok(Vec::new()),
        }
    }

    /// Load the collection, treating any failure as "no books".
    ///
    /// Malformed persisted data must never take the app down; the
    /// failure is logged and the caller renders an empty library.
    pub fn load_or_empty(&self) -> Vec<Book> {
        match self.load() {
            Ok(books) => books,
            Err(err) => {
                warn!(error = %err, "could not load book collection, starting empty");
                Vec::new()
            }
        }
    }

    /// Replace the persisted collection with `books`, then sweep the
    /// covers directory for files no record references.
    ///
    /// Callers own the merge: find-by-id-or-append before calling save.
    /// On error nothing was written and the previous blob is intact.
    pub fn save(&self, books: &[Book]) -> Result<CleanupReport, StoreError> {
        let blob = serde_json::to_value(books).map_err(StoreError::Serialize)?;
        self.prefs.set_value(&self.storage_key, blob)?;

        Ok(self.cleanup_unused_covers(books))
    }

    /// Delete every file in the covers directory whose name is not
    /// referenced by any book in `books`.
    ///
    /// This is a full sweep recomputed from scratch on every save, so a
    /// deletion missed in an earlier session is picked up here.
    fn cleanup_unused_covers(&self, books: &[Book]) -> CleanupReport {
        let mut report = CleanupReport::default();

        // No directory means no covers were ever written.
        if !self.covers_dir.exists() {
            return report;
        }

        let entries = match fs::read_dir(&self.covers_dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    dir = %self.covers_dir.display(),
                    error = %err,
                    "could not list covers directory, skipping cleanup"
                );
                return report;
            }
        };

        let used: std::collections::HashSet<&str> = books
            .iter()
            .filter_map(|b| b.cover_filename.as_deref())
            .collect();

        for entry in entries.filter_map(|e| e.ok()) {
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }

            let filename = entry.file_name().to_string_lossy().into_owned();
            if used.contains(filename.as_str()) {
                continue;
            }

            match fs::remove_file(entry.path()) {
                Ok(()) => {
                    debug!(cover = %filename, "removed unused cover");
                    report.removed.push(filename);
                }
                Err(err) => {
                    warn!(cover = %filename, error = %err, "could not remove unused cover");
                    report.failed.push(filename);
                }
            }
        }

        report
    }
}
