//! OCR capability boundary and recognition service
//!
//! The engine itself is consumed, not implemented: anything that can turn an
//! image into text plus a mean confidence satisfies [`TextRecognizer`]. The
//! Tesseract backend lives behind the `tesseract` cargo feature.
//!
//! [`RecognitionService`] owns one engine instance for a session, turns one
//! image file into one [`RecognitionRecord`], and releases the engine's
//! native resources deterministically via [`RecognitionService::shutdown`].

#[cfg(feature = "tesseract")]
pub mod tesseract;

#[cfg(feature = "tesseract")]
pub use tesseract::TesseractEngine;

use std::path::Path;

use chrono::Utc;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{RecognitionRecord, Region};
use crate::error::{Error, Result};

/// Raw engine output for one image
#[derive(Debug, Clone)]
pub struct RawRecognition {
    /// Recognized text, untrimmed
    pub text: String,
    /// Whole-page mean confidence in [0.0, 1.0]
    pub mean_confidence: f32,
}

/// The consumed OCR capability: one image in, text and confidence out.
///
/// Implementations are not assumed to be thread-safe; parallel recognition
/// needs one engine instance per worker.
pub trait TextRecognizer {
    fn recognize(&mut self, image: &DynamicImage) -> anyhow::Result<RawRecognition>;
}

/// How recognized text is normalized before storage.
///
/// Leading/trailing whitespace is always trimmed; this policy controls
/// anything beyond that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextNormalization {
    /// Trim only, store engine output as-is
    #[default]
    TrimOnly,
    /// Trim and uppercase, matching an uppercase character whitelist
    Uppercase,
}

impl TextNormalization {
    fn apply(self, raw: &str) -> String {
        let trimmed = raw.trim();
        match self {
            Self::TrimOnly => trimmed.to_string(),
            Self::Uppercase => trimmed.to_uppercase(),
        }
    }
}

/// Wraps an OCR engine for the duration of a session
pub struct RecognitionService<E: TextRecognizer> {
    engine: Option<E>,
    normalization: TextNormalization,
}

impl<E: TextRecognizer> RecognitionService<E> {
    pub fn new(engine: E, normalization: TextNormalization) -> Self {
        Self {
            engine: Some(engine),
            normalization,
        }
    }

    /// Whether the engine is still available for recognition
    pub fn is_ready(&self) -> bool {
        self.engine.is_some()
    }

    /// Recognize one image file and build its record.
    ///
    /// One engine invocation, no retry. Fails with
    /// [`Error::EngineNotReady`] after [`shutdown`](Self::shutdown) and with
    /// [`Error::Recognition`] when the file cannot be loaded or processed.
    pub fn recognize_file(&mut self, image_path: &Path) -> Result<RecognitionRecord> {
        let engine = self.engine.as_mut().ok_or(Error::EngineNotReady)?;

        let image =
            image::open(image_path).map_err(|e| Error::recognition(image_path, e))?;

        let raw = engine
            .recognize(&image)
            .map_err(|e| Error::recognition(image_path, e))?;

        let text = self.normalization.apply(&raw.text);
        debug!(
            path = %image_path.display(),
            text = %text,
            confidence = raw.mean_confidence,
            "recognized image"
        );

        Ok(RecognitionRecord {
            text,
            image_path: image_path.to_string_lossy().into_owned(),
            created_at: Utc::now(),
            confidence: raw.mean_confidence,
            region: Region::full_extent(image.width(), image.height()),
        })
    }

    #[cfg(test)]
    pub(crate) fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Release the engine and its native resources.
    ///
    /// Idempotent; any later [`recognize_file`](Self::recognize_file) call
    /// fails with [`Error::EngineNotReady`].
    pub fn shutdown(&mut self) {
        if self.engine.take().is_some() {
            debug!("OCR engine shut down");
        }
    }
}

impl<E: TextRecognizer> Drop for RecognitionService<E> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
pub(crate) mod stub {
    //! In-memory engine used by unit tests

    use super::*;
    use std::collections::HashMap;

    /// Scripted recognizer keyed by image width.
    ///
    /// The engine only ever sees pixel data, so tests give each file a
    /// distinct width and script the outcome for it. Calls are counted to
    /// assert that deduplicated files never reach the engine.
    pub struct StubRecognizer {
        outcomes: HashMap<u32, (String, f32)>,
        fail_widths: Vec<u32>,
        pub calls: usize,
    }

    impl StubRecognizer {
        pub fn new() -> Self {
            Self {
                outcomes: HashMap::new(),
                fail_widths: Vec::new(),
                calls: 0,
            }
        }

        pub fn with_outcome(mut self, width: u32, text: &str, confidence: f32) -> Self {
            self.outcomes
                .insert(width, (text.to_string(), confidence));
            self
        }

        pub fn failing_on(mut self, width: u32) -> Self {
            self.fail_widths.push(width);
            self
        }
    }

    impl TextRecognizer for StubRecognizer {
        fn recognize(&mut self, image: &DynamicImage) -> anyhow::Result<RawRecognition> {
            self.calls += 1;
            let width = image.width();
            if self.fail_widths.contains(&width) {
                anyhow::bail!("simulated engine failure for width {width}");
            }
            let (text, confidence) = self
                .outcomes
                .get(&width)
                .cloned()
                .unwrap_or_else(|| ("STUB".to_string(), 1.0));
            Ok(RawRecognition {
                text,
                mean_confidence: confidence,
            })
        }
    }
}
