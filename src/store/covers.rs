//! Cover image ingestion.
//!
//! Covers arrive as arbitrary image files picked by the user. They are
//! re-encoded as JPEG into the covers directory under a fresh
//! `cover_<uuid>.jpg` name; records then reference that filename only,
//! never a path.

use std::fs;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use tracing::warn;
use uuid::Uuid;

use super::books::BookStore;
use super::error::StoreError;

/// JPEG quality used for stored covers.
const COVER_JPEG_QUALITY: u8 = 90;

impl BookStore {
    /// Import an image file as a cover and return the filename to put
    /// on the record.
    ///
    /// `replacing` is the record's previous cover, deleted best-effort
    /// so an edit does not leave the old file waiting for the next
    /// cleanup sweep. The caller still has to save a record referencing
    /// the returned filename, otherwise the next save's sweep collects
    /// the new file as an orphan.
    pub fn import_cover(
        &self,
        source: &Path,
        replacing: Option<&str>,
    ) -> Result<String, StoreError> {
        let img = image::open(source)?;

        fs::create_dir_all(self.covers_dir())
            .map_err(|e| StoreError::io(self.covers_dir(), e))?;

        if let Some(old) = replacing {
            if let Err(err) = fs::remove_file(self.cover_path(old)) {
                warn!(cover = %old, error = %err, "could not remove replaced cover");
            }
        }

        let mut encoded = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut encoded, COVER_JPEG_QUALITY);
        // JPEG has no alpha channel; flatten before encoding.
        img.to_rgb8().write_with_encoder(encoder)?;

        let filename = format!("cover_{}.jpg", Uuid::new_v4());
        let path = self.cover_path(&filename);
        fs::write(&path, &encoded).map_err(|e| StoreError::io(&path, e))?;

        Ok(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::books::STORAGE_KEY;
    use tempfile::{tempdir, TempDir};

    fn test_store(dir: &TempDir) -> BookStore {
        BookStore::new(
            dir.path().join("prefs.json"),
            STORAGE_KEY,
            dir.path().join("covers"),
        )
    }

    fn write_test_png(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("picked.png");
        let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([200, 40, 40, 255]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_import_writes_a_jpeg_cover() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);
        let source = write_test_png(&dir);

        let filename = store.import_cover(&source, None).unwrap();

        assert!(filename.starts_with("cover_"));
        assert!(filename.ends_with(".jpg"));
        let stored = image::open(store.cover_path(&filename)).unwrap();
        assert_eq!(stored.width(), 8);
        assert_eq!(stored.height(), 8);
    }

    #[test]
    fn test_import_deletes_the_replaced_cover() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);
        let source = write_test_png(&dir);

        let first = store.import_cover(&source, None).unwrap();
        assert!(store.cover_path(&first).exists());

        let second = store.import_cover(&source, Some(&first)).unwrap();
        assert!(!store.cover_path(&first).exists());
        assert!(store.cover_path(&second).exists());
        assert_ne!(first, second);
    }

    #[test]
    fn test_import_of_unreadable_source_fails_cleanly() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);
        let bogus = dir.path().join("not_an_image.txt");
        fs::write(&bogus, b"plain text").unwrap();

        assert!(matches!(
            store.import_cover(&bogus, None),
            Err(StoreError::Image(_))
        ));
    }
}
