//! End-to-end pipeline test against a real Tesseract installation.
//!
//! Only built with `--features tesseract`; needs the native tesseract and
//! leptonica libraries plus the `eng` traineddata.

#![cfg(feature = "tesseract")]

use serial_ocr::config::{DatasetConfig, PipelineConfig, SynthConfig};
use serial_ocr::ocr::TesseractEngine;
use serial_ocr::{OcrSession, TextNormalization};
use tempfile::TempDir;

#[test]
fn generated_images_round_trip_through_tesseract() {
    let dir = TempDir::new().unwrap();
    let mut config = PipelineConfig {
        synth: SynthConfig {
            output_folder: dir.path().join("generated_images"),
            ..SynthConfig::default()
        },
        dataset: DatasetConfig {
            dataset_path: dir.path().join("dataset.json"),
            // Real engine confidence on synthetic renderings varies; the
            // filter itself is covered by unit tests.
            min_confidence: 0.0,
        },
        ..PipelineConfig::default()
    };
    config.ocr.normalization = TextNormalization::Uppercase;

    let engine = TesseractEngine::new(&config.ocr).expect("tesseract must be installed");
    let mut session = OcrSession::open(engine, &config).unwrap();

    session.generate_training_data("SN-001", 5).unwrap();
    let appended = session.process_generated_images().unwrap();
    assert!(appended >= 1, "tesseract recognized none of 5 clean renderings");

    let whitelist = &config.ocr.char_whitelist;
    for record in &session.dataset().records {
        assert!(!record.text.is_empty());
        assert!(
            record.text.chars().all(|c| whitelist.contains(c) || c.is_whitespace()),
            "whitelist leaked character in {:?}",
            record.text
        );
    }

    session.save().unwrap();
    session.shutdown();
}
