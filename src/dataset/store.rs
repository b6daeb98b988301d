//! Dataset persistence
//!
//! Loads and saves the dataset as pretty-printed JSON. A missing file on
//! `load` is the expected first-run state, not an error; an explicit `import`
//! path is different and must exist. Saves go through a temporary file and a
//! rename so a crash mid-write never leaves a truncated dataset behind.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};

use super::Dataset;
use crate::error::{Error, Result};

/// Loads, saves, imports, and exports datasets at a configured default path
pub struct DatasetStore {
    dataset_path: PathBuf,
}

impl DatasetStore {
    pub fn new(dataset_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: dataset_path.into(),
        }
    }

    /// Default path this store reads from and writes to
    pub fn path(&self) -> &Path {
        &self.dataset_path
    }

    /// Load the dataset from the configured path.
    ///
    /// Returns an empty dataset when no file exists yet (first run).
    pub fn load(&self) -> Result<Dataset> {
        if !self.dataset_path.exists() {
            debug!(path = %self.dataset_path.display(), "no dataset file, starting empty");
            return Ok(Dataset::default());
        }
        read_dataset(&self.dataset_path)
    }

    /// Save the dataset to the configured path, overwriting any previous
    /// content. Recomputes `last_updated` and `total_images` first.
    pub fn save(&self, dataset: &mut Dataset) -> Result<()> {
        dataset.last_updated = Utc::now();
        dataset.total_images = dataset.records.len();

        write_dataset(dataset, &self.dataset_path)?;
        info!(
            path = %self.dataset_path.display(),
            records = dataset.total_images,
            "dataset saved"
        );
        Ok(())
    }

    /// Write the dataset to an arbitrary caller-chosen path.
    ///
    /// Serializes the dataset as-is; derived fields are not touched.
    pub fn export(&self, dataset: &Dataset, export_path: &Path) -> Result<()> {
        write_dataset(dataset, export_path)?;
        info!(path = %export_path.display(), "dataset exported");
        Ok(())
    }

    /// Read a dataset from an arbitrary caller-chosen path.
    ///
    /// Unlike [`load`](Self::load), a missing file here is an error: an
    /// explicit import path implies the caller expects it to exist.
    pub fn import(&self, import_path: &Path) -> Result<Dataset> {
        if !import_path.exists() {
            return Err(Error::NotFound {
                path: import_path.to_path_buf(),
            });
        }
        read_dataset(import_path)
    }
}

fn read_dataset(path: &Path) -> Result<Dataset> {
    let content =
        std::fs::read_to_string(path).map_err(|e| Error::persistence(path, e))?;
    serde_json::from_str(&content).map_err(|e| Error::persistence(path, e))
}

fn write_dataset(dataset: &Dataset, path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(dataset).map_err(|e| Error::persistence(path, e))?;

    // Temp file in the same directory so the rename stays on one filesystem.
    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, json).map_err(|e| Error::persistence(&tmp_path, e))?;
    std::fs::rename(&tmp_path, path).map_err(|e| Error::persistence(path, e))?;
    Ok(())
}
