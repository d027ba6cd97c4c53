//! Source dataset layouts
//!
//! Each supported dataset knows where its images and labels live, which splits
//! it has and how to turn one label file into [`FrameAnnotation`]s.

pub mod bdd100k;
pub mod inoutdoor;

use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

use crate::coco::{Info, License};
use crate::config::{Args, BddVersion, Dataset, Modality};
use crate::error::{ConvertError, Result};
use crate::types::{FoldListing, FramePaths, FrameAnnotation};

/// How source images reach the output directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTransfer {
    /// Byte-for-byte copy, keeping the source extension
    Copy,
    /// Decoded and written again as an RGB JPEG
    ReencodeJpeg,
}

impl ImageTransfer {
    /// Output file name for a source image.
    pub fn file_name(&self, image: &Path, stem: &str) -> String {
        let extension = match self {
            ImageTransfer::Copy => image
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or("png"),
            ImageTransfer::ReencodeJpeg => "jpg",
        };
        sanitize_filename::sanitize(format!("{}.{}", stem, extension))
    }
}

/// Everything the writers need to know about one source dataset.
#[derive(Debug, Clone)]
pub struct DatasetProfile {
    pub dataset: Dataset,
    pub root: PathBuf,
    pub prefix: &'static str,
    pub year: u32,
    pub folds: &'static [&'static str],
    pub modality: Option<Modality>,
    pub bdd_version: BddVersion,
    pub image_transfer: ImageTransfer,
}

impl DatasetProfile {
    pub fn from_args(args: &Args) -> Self {
        let root = PathBuf::from(&args.dataset_dir);
        match args.dataset {
            Dataset::Bdd100k => Self {
                dataset: args.dataset,
                root,
                prefix: bdd100k::PREFIX,
                year: bdd100k::YEAR,
                folds: bdd100k::FOLDS,
                modality: None,
                bdd_version: args.bdd_version,
                image_transfer: ImageTransfer::ReencodeJpeg,
            },
            Dataset::Inoutdoor => Self {
                dataset: args.dataset,
                root,
                prefix: inoutdoor::PREFIX,
                year: inoutdoor::YEAR,
                folds: inoutdoor::FOLDS,
                modality: Some(args.modality),
                bdd_version: args.bdd_version,
                image_transfer: ImageTransfer::Copy,
            },
        }
    }

    /// Split directory name, e.g. `train2017`.
    pub fn split_name(&self, fold: &str) -> String {
        format!("{}{}", fold, self.year)
    }

    /// Output sub-directory for the modality, if the dataset has several.
    pub fn modality_dir(&self) -> Option<&'static str> {
        self.modality.map(|modality| modality.as_str())
    }

    /// Fail early when the dataset root lacks one of its required directories.
    pub fn validate(&self) -> Result<()> {
        let required = match self.dataset {
            Dataset::Bdd100k => bdd100k::required_dirs(&self.root),
            Dataset::Inoutdoor => inoutdoor::required_dirs(&self.root),
        };
        for dir in required {
            if !dir.is_dir() {
                return Err(ConvertError::MissingDirectory(dir));
            }
        }
        Ok(())
    }

    pub fn list_fold(&self, fold: &str) -> Result<FoldListing> {
        match self.dataset {
            Dataset::Bdd100k => bdd100k::list_fold(&self.root, self.bdd_version, fold),
            Dataset::Inoutdoor => inoutdoor::list_fold(
                &self.root,
                self.modality.unwrap_or(Modality::Rgb),
                fold,
            ),
        }
    }

    pub fn read_frame(&self, frame: &FramePaths) -> Result<FrameAnnotation> {
        match self.dataset {
            Dataset::Bdd100k => bdd100k::read_label_file(&frame.label),
            Dataset::Inoutdoor => inoutdoor::read_label_file(&frame.label),
        }
    }

    pub fn coco_info(&self) -> Info {
        match self.dataset {
            Dataset::Bdd100k => Info::new("deepdrive.org", 2018, "Berkeley"),
            Dataset::Inoutdoor => Info::new(
                "ais.informatik.uni-freiburg.de",
                2015,
                "University of Freiburg",
            ),
        }
    }

    pub fn coco_license(&self) -> License {
        match self.dataset {
            Dataset::Bdd100k => License::new(1, "COCO"),
            Dataset::Inoutdoor => License::new(1, "CC"),
        }
    }
}

/// Apply `--max_images`, optionally drawing a seeded random subset.
///
/// The result is always in sorted order.
pub fn select_frames(
    mut frames: Vec<FramePaths>,
    max_images: Option<usize>,
    shuffle: bool,
    seed: u64,
) -> Vec<FramePaths> {
    frames.sort();
    let Some(max_images) = max_images else {
        return frames;
    };
    if frames.len() <= max_images {
        return frames;
    }

    if shuffle {
        let mut rng = StdRng::seed_from_u64(seed);
        frames.shuffle(&mut rng);
    }
    info!(
        "Keeping {} of {} frames{}",
        max_images,
        frames.len(),
        if shuffle { " (shuffled)" } else { "" }
    );
    frames.truncate(max_images);
    frames.sort();
    frames
}
