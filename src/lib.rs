//! serial-ocr - synthetic serial-number images and incremental OCR datasets
//!
//! The pipeline has four stages: [`synth::ImageSynthesizer`] renders
//! randomized training images of a serial number, [`ocr::RecognitionService`]
//! turns one image file into one [`dataset::RecognitionRecord`] through a
//! pluggable engine, [`pipeline::process_folder`] batches that over a folder
//! with dedup and confidence filtering, and [`dataset::DatasetStore`]
//! persists the accumulated dataset as JSON. [`session::OcrSession`] wires
//! the stages together for a run.
//!
//! The OCR engine is a consumed capability behind [`ocr::TextRecognizer`];
//! enable the `tesseract` feature for the bundled Tesseract backend.

pub mod config;
pub mod dataset;
pub mod error;
pub mod ocr;
pub mod pipeline;
pub mod session;
pub mod synth;

pub use config::PipelineConfig;
pub use dataset::{Dataset, DatasetStore, RecognitionRecord, Region};
pub use error::{Error, Result};
pub use ocr::{RecognitionService, TextNormalization, TextRecognizer};
pub use pipeline::process_folder;
pub use session::OcrSession;
pub use synth::ImageSynthesizer;
