use std::path::{Path, PathBuf};
use thiserror::Error;

// Supported image formats when pairing images with labels
pub const IMG_FORMATS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

/// One object as read from a source label file, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObject {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub category: String,
}

/// All box objects of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameAnnotation {
    pub objects: Vec<RawObject>,
    /// `(width, height)` when the label file records it
    pub image_size: Option<(u32, u32)>,
}

/// An image and the label file describing it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FramePaths {
    pub stem: String,
    pub image: PathBuf,
    pub label: PathBuf,
}

/// The frames of one split plus what could not be paired.
#[derive(Debug, Default)]
pub struct FoldListing {
    pub frames: Vec<FramePaths>,
    pub skipped: Vec<SkippedRecord>,
}

/// Why a frame or an object was left out of the output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("no label file for image")]
    MissingLabel,
    #[error("image file not found")]
    MissingImage,
    #[error("unknown category `{0}`")]
    UnknownCategory(String),
    #[error("{0}")]
    InvalidBox(String),
    #[error("image size {width}x{height} cannot be used for normalization")]
    EmptyImage { width: u32, height: u32 },
    #[error("no boxes to write")]
    NoObjects,
    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub path: PathBuf,
    pub reason: SkipReason,
}

impl SkippedRecord {
    pub fn new(path: impl Into<PathBuf>, reason: SkipReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}

// Struct to hold processing statistics
#[derive(Debug, Default, Clone)]
pub struct ProcessingStats {
    pub total_frames: usize,
    pub converted_frames: usize,
    pub boxes_written: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_total(&mut self) {
        self.total_frames += 1;
    }

    pub fn increment_converted(&mut self, boxes: usize) {
        self.converted_frames += 1;
        self.boxes_written += boxes;
    }

    pub fn record_skip(&mut self, path: &Path, reason: SkipReason) {
        log::warn!("Skipping {}: {}", path.display(), reason);
        self.skipped.push(SkippedRecord::new(path, reason));
    }

    pub fn extend_skipped(&mut self, records: impl IntoIterator<Item = SkippedRecord>) {
        for record in records {
            self.record_skip(&record.path, record.reason);
        }
    }

    /// Number of skipped records with the given reason.
    pub fn count_skipped(&self, predicate: impl Fn(&SkipReason) -> bool) -> usize {
        self.skipped
            .iter()
            .filter(|record| predicate(&record.reason))
            .count()
    }

    pub fn merge(&mut self, other: ProcessingStats) {
        self.total_frames += other.total_frames;
        self.converted_frames += other.converted_frames;
        self.boxes_written += other.boxes_written;
        self.skipped.extend(other.skipped);
    }

    pub fn print_summary(&self) {
        log::info!("=== Processing Summary ===");
        log::info!("Total frames: {}", self.total_frames);
        log::info!("Converted frames: {}", self.converted_frames);
        log::info!("Boxes written: {}", self.boxes_written);

        if !self.skipped.is_empty() {
            log::warn!("Skipped records: {}", self.skipped.len());
            for record in &self.skipped {
                log::warn!("  {}: {}", record.path.display(), record.reason);
            }
        }
    }
}
