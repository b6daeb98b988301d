//! Pipeline session
//!
//! Owns the in-memory dataset for a run and wires synthesizer, recognition
//! service, aggregator, and store together. This is the only place accepted
//! records are appended to the dataset; everything below it either produces
//! records or borrows the dataset read-only.

use std::path::Path;

use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::dataset::{Dataset, DatasetStore};
use crate::error::{Error, Result};
use crate::ocr::{RecognitionService, TextRecognizer};
use crate::pipeline::process_folder;
use crate::synth::ImageSynthesizer;

/// One generate/recognize/persist session over a single dataset
pub struct OcrSession<E: TextRecognizer> {
    service: RecognitionService<E>,
    synthesizer: ImageSynthesizer,
    store: DatasetStore,
    dataset: Dataset,
    min_confidence: f32,
}

impl<E: TextRecognizer> OcrSession<E> {
    /// Open a session with an already-initialized engine.
    ///
    /// Loads the persisted dataset; a corrupt dataset file degrades to a
    /// fresh empty dataset with a warning rather than failing the session.
    /// First run (no file yet) starts empty without any warning.
    pub fn open(engine: E, config: &PipelineConfig) -> Result<Self> {
        let service = RecognitionService::new(engine, config.ocr.normalization);
        let synthesizer = ImageSynthesizer::new(config.synth.clone())?;
        let store = DatasetStore::new(&config.dataset.dataset_path);

        let dataset = match store.load() {
            Ok(dataset) => dataset,
            Err(e @ Error::Persistence { .. }) => {
                warn!("could not load dataset, starting fresh: {e}");
                Dataset::default()
            }
            Err(e) => return Err(e),
        };

        info!(records = dataset.records.len(), "session opened");
        Ok(Self {
            service,
            synthesizer,
            store,
            dataset,
            min_confidence: config.dataset.min_confidence,
        })
    }

    /// Synthesize `count` training images of `text` into the output folder
    pub fn generate_training_data(&mut self, text: &str, count: usize) -> Result<()> {
        self.synthesizer.generate(text, count)?;
        Ok(())
    }

    /// Recognize every new image in the output folder and append the
    /// accepted records to the dataset. Returns how many were appended.
    pub fn process_generated_images(&mut self) -> Result<usize> {
        let folder = self.synthesizer.output_folder().to_path_buf();
        let records = process_folder(
            &mut self.service,
            &folder,
            &self.dataset,
            self.min_confidence,
        )?;
        let appended = records.len();
        self.dataset.records.extend(records);
        Ok(appended)
    }

    /// Persist the dataset at its configured path
    pub fn save(&mut self) -> Result<()> {
        self.store.save(&mut self.dataset)
    }

    /// Write the dataset to a caller-chosen path
    pub fn export(&self, path: &Path) -> Result<()> {
        self.store.export(&self.dataset, path)
    }

    /// Replace the in-memory dataset with one read from `path`
    pub fn import(&mut self, path: &Path) -> Result<()> {
        self.dataset = self.store.import(path)?;
        info!(records = self.dataset.records.len(), "dataset imported");
        Ok(())
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Release the OCR engine; the session can still save and export
    pub fn shutdown(&mut self) {
        self.service.shutdown();
    }
}
