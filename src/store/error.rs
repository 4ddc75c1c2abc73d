use std::path::PathBuf;
use thiserror::Error;

/// Failures the storage layer can report.
///
/// Nothing here is fatal to the caller: a corrupt blob degrades to an
/// empty collection through [`BookStore::load_or_empty`], and a failed
/// save leaves the previous on-disk state untouched.
///
/// [`BookStore::load_or_empty`]: crate::store::BookStore::load_or_empty
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The preference file or the book blob exists but is not valid JSON
    /// of the expected shape. Treated as "no books" by callers that want
    /// the degrade-to-empty behavior.
    #[error("stored book data is malformed: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("failed to serialize book collection: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to process cover image: {0}")]
    Image(#[from] image::ImageError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
