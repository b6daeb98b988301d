//! Tesseract OCR backend via leptess
//!
//! Initialization configures the language and the character whitelist once;
//! everything else is a straight image-in, text-out call. Native engine
//! resources are released when the engine is dropped.

use anyhow::Context;
use image::DynamicImage;
use leptess::{LepTess, Variable};
use tracing::{error, info};

use super::{RawRecognition, TextRecognizer};
use crate::config::OcrConfig;
use crate::error::{Error, Result};

/// Tesseract works best around 300 DPI; synthesized images carry no DPI
/// metadata, so it is set explicitly.
const SOURCE_RESOLUTION: i32 = 300;

/// OCR engine backed by a native Tesseract instance
pub struct TesseractEngine {
    engine: LepTess,
}

impl TesseractEngine {
    /// Initialize Tesseract with the configured language and restrict its
    /// output to the character whitelist (letters, digits, hyphen by
    /// default) so it cannot produce characters impossible in a serial
    /// number.
    ///
    /// Initialization failure is fatal for the session and surfaces as
    /// [`Error::EngineNotReady`].
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let datapath = config
            .tessdata_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());

        let mut engine = LepTess::new(datapath.as_deref(), &config.language).map_err(|e| {
            error!(language = %config.language, "failed to initialize tesseract: {e}");
            Error::EngineNotReady
        })?;

        engine
            .set_variable(Variable::TesseditCharWhitelist, &config.char_whitelist)
            .map_err(|e| {
                error!("failed to set tesseract character whitelist: {e}");
                Error::EngineNotReady
            })?;

        info!(language = %config.language, "tesseract engine initialized");
        Ok(Self { engine })
    }
}

impl TextRecognizer for TesseractEngine {
    fn recognize(&mut self, image: &DynamicImage) -> anyhow::Result<RawRecognition> {
        // leptess wants image data in a standard encoded format
        let mut png_bytes = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut png_bytes);
        image
            .write_to(&mut cursor, image::ImageFormat::Png)
            .context("failed to encode image for tesseract")?;

        self.engine
            .set_image_from_mem(&png_bytes)
            .context("failed to load image into tesseract")?;
        self.engine.set_source_resolution(SOURCE_RESOLUTION);

        let text = self
            .engine
            .get_utf8_text()
            .context("failed to extract text")?;
        // mean_text_conf reports 0-100; the pipeline works in [0.0, 1.0]
        let mean_confidence = self.engine.mean_text_conf() as f32 / 100.0;

        Ok(RawRecognition {
            text,
            mean_confidence,
        })
    }
}
