//! Dataset model
//!
//! A dataset is the aggregate of every accepted recognition result, persisted
//! wholesale as a single JSON document. `image_path` is the dedup key: a
//! given source image never produces two records in the same dataset.

pub mod store;

pub use store::DatasetStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Rectangular area associated with a recognized text span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Region covering a full image of the given dimensions
    pub fn full_extent(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// One OCR outcome tied to one source image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionRecord {
    /// Recognized text (may be empty)
    pub text: String,
    /// Path of the source image; unique within a dataset
    pub image_path: String,
    /// When recognition ran
    pub created_at: DateTime<Utc>,
    /// Engine-reported mean confidence, normalized to [0.0, 1.0]
    pub confidence: f32,
    /// Recognized area; full image extent when the engine supplies no boxes
    pub region: Region,
}

/// Aggregate of all accepted recognition records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub records: Vec<RecognitionRecord>,
    /// Set by [`DatasetStore::save`] on every successful save
    pub last_updated: DateTime<Utc>,
    /// Recomputed from `records.len()` by [`DatasetStore::save`]
    pub total_images: usize,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            last_updated: Utc::now(),
            total_images: 0,
        }
    }
}

impl Dataset {
    /// Image paths already recorded, used to skip reprocessing
    pub fn seen_paths(&self) -> HashSet<&str> {
        self.records.iter().map(|r| r.image_path.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str) -> RecognitionRecord {
        RecognitionRecord {
            text: "SN001".to_string(),
            image_path: path.to_string(),
            created_at: Utc::now(),
            confidence: 0.9,
            region: Region::full_extent(400, 100),
        }
    }

    #[test]
    fn test_default_dataset_is_empty() {
        let dataset = Dataset::default();
        assert!(dataset.records.is_empty());
        assert_eq!(dataset.total_images, 0);
    }

    #[test]
    fn test_seen_paths_collects_every_record() {
        let mut dataset = Dataset::default();
        dataset.records.push(record("a.png"));
        dataset.records.push(record("b.png"));

        let seen = dataset.seen_paths();
        assert_eq!(seen.len(), 2);
        assert!(seen.contains("a.png"));
        assert!(seen.contains("b.png"));
        assert!(!seen.contains("c.png"));
    }

    #[test]
    fn test_full_extent_region() {
        let region = Region::full_extent(320, 80);
        assert_eq!(region.x, 0);
        assert_eq!(region.y, 0);
        assert_eq!(region.width, 320);
        assert_eq!(region.height, 80);
    }
}
