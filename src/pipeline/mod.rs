//! Batch recognition over a folder of images
//!
//! Walks every PNG in a folder, skips images the dataset has already
//! recorded, and filters what the engine returns by confidence. This is the
//! only place dedup and confidence policy live; the caller decides what to
//! do with the accepted records (normally: append to the dataset and save).

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::dataset::{Dataset, RecognitionRecord};
use crate::error::{Error, Result};
use crate::ocr::{RecognitionService, TextRecognizer};

/// Recognize every not-yet-recorded PNG under `folder`.
///
/// Reads `dataset` only for its dedup set and never mutates it; the returned
/// records are exactly those that passed both filters (non-empty text,
/// `confidence >= min_confidence`). A single failing image is logged and
/// skipped; only [`Error::EngineNotReady`] aborts the batch, since no file
/// can succeed without an engine.
pub fn process_folder<E: TextRecognizer>(
    service: &mut RecognitionService<E>,
    folder: &Path,
    dataset: &Dataset,
    min_confidence: f32,
) -> Result<Vec<RecognitionRecord>> {
    let files = enumerate_images(folder)?;
    let seen = dataset.seen_paths();

    let mut accepted = Vec::new();
    let mut skipped = 0usize;
    let mut failed = 0usize;

    for path in &files {
        // Dedup check happens before the engine is ever invoked.
        if seen.contains(path.to_string_lossy().as_ref()) {
            skipped += 1;
            continue;
        }

        let record = match service.recognize_file(path) {
            Ok(record) => record,
            Err(Error::EngineNotReady) => return Err(Error::EngineNotReady),
            Err(e) => {
                warn!(path = %path.display(), "skipping image: {e}");
                failed += 1;
                continue;
            }
        };

        if !record.text.is_empty() && record.confidence >= min_confidence {
            accepted.push(record);
        }
    }

    info!(
        folder = %folder.display(),
        total = files.len(),
        accepted = accepted.len(),
        skipped,
        failed,
        "folder processed"
    );
    Ok(accepted)
}

/// PNG files in the folder, sorted by path for reproducible runs
fn enumerate_images(folder: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(folder).map_err(|e| Error::storage(folder, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::storage(folder, e))?;
        let path = entry.path();
        let is_png = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if path.is_file() && is_png {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
