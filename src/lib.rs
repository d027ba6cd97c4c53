//! Detection dataset to YOLO / COCO converter
//!
//! This library converts BDD100K and InOutDoorPeopleRGBD annotations into
//! YOLO label files and COCO instances documents for object detection training.

pub mod boxes;
pub mod categories;
pub mod coco;
pub mod coco_dataset;
pub mod config;
pub mod conversion;
pub mod error;
pub mod io;
pub mod sources;
pub mod types;
pub mod utils;
pub mod yolo_dataset;

// Re-export commonly used types and functions
pub use boxes::{BoundingBox, Coordinate, Normalization};
pub use categories::CategoryMap;
pub use config::{Args, Dataset, Modality};
pub use error::{ConvertError, Result};
pub use sources::DatasetProfile;
pub use types::{ProcessingStats, SkipReason, SkippedRecord};
pub use yolo_dataset::{process_dataset, setup_output_directories};

// COCO-specific exports
pub use coco::{CocoFile, CocoWriter};
pub use coco_dataset::{process_coco_dataset, setup_coco_output_directories};
