//! Pipeline configuration
//!
//! User-tunable settings stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ocr::TextNormalization;

/// Settings for the whole recognition pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Image synthesis settings
    pub synth: SynthConfig,
    /// OCR engine settings
    pub ocr: OcrConfig,
    /// Dataset settings
    pub dataset: DatasetConfig,
}

/// Image synthesis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthConfig {
    /// Folder synthesized images are written to
    pub output_folder: PathBuf,
    /// Base image width in pixels; jittered by +/- `width_jitter`
    pub base_width: u32,
    pub width_jitter: u32,
    /// Base image height in pixels; jittered by +/- `height_jitter`
    pub base_height: u32,
    pub height_jitter: u32,
    /// Base font size in pixels
    pub base_font_size: f32,
    /// Extra font files to draw from; system fonts are used when empty
    pub font_paths: Vec<PathBuf>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            output_folder: PathBuf::from("generated_images"),
            base_width: 400,
            width_jitter: 50,
            base_height: 100,
            height_jitter: 20,
            base_font_size: 18.0,
            font_paths: Vec::new(),
        }
    }
}

/// OCR engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Tesseract data directory; engine default when unset
    pub tessdata_path: Option<PathBuf>,
    /// Recognition language
    pub language: String,
    /// Characters the engine may produce
    pub char_whitelist: String,
    /// How recognized text is normalized before storage
    pub normalization: TextNormalization,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tessdata_path: None,
            language: "eng".to_string(),
            char_whitelist: "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-".to_string(),
            normalization: TextNormalization::default(),
        }
    }
}

/// Dataset settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path of the persisted dataset document
    pub dataset_path: PathBuf,
    /// Records below this confidence are dropped (0.0 - 1.0 scale)
    pub min_confidence: f32,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("dataset.json"),
            min_confidence: 0.5,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: PipelineConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &PipelineConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
