use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

use crate::categories::CategoryMap;
use crate::error::Result;

/// Command-line arguments for converting detection datasets to YOLO or COCO format.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Root directory of the source dataset
    #[arg(short = 'd', long = "dataset_dir")]
    pub dataset_dir: String,

    /// Layout of the source dataset
    #[arg(long = "dataset", value_enum)]
    pub dataset: Dataset,

    /// Output directory (defaults to ./<prefix>_yolo or ./<prefix>)
    #[arg(short = 'o', long = "output_dir")]
    pub output_dir: Option<String>,

    /// Image modality to convert (InOutDoorPeopleRGBD only)
    #[arg(long = "modality", value_enum, default_value = "rgb")]
    pub modality: Modality,

    /// Image set version (BDD100K only)
    #[arg(long = "bdd_version", value_enum, default_value = "100k")]
    pub bdd_version: BddVersion,

    /// Maximum number of images to convert per split
    #[arg(long = "max_images", value_parser = validate_max_images)]
    pub max_images: Option<usize>,

    /// Shuffle each split before applying --max_images
    #[arg(long = "shuffle")]
    pub shuffle: bool,

    /// Seed for random shuffling
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,

    /// Keep images that end up without any box
    #[arg(long = "include_background")]
    pub include_background: bool,

    /// First COCO image id of every split
    #[arg(long = "start_image_id", default_value_t = 0)]
    pub start_image_id: u64,

    /// First COCO annotation id of the run
    #[arg(long = "start_annotation_id", default_value_t = 0)]
    pub start_annotation_id: u64,

    /// Ordered list of categories, overriding the dataset's own
    #[arg(use_value_delimiter = true)]
    pub label_list: Vec<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Dataset {
    /// Berkeley DeepDrive, one JSON file per frame
    Bdd100k,
    /// InOutDoorPeopleRGBD, one YAML or XML file per frame
    Inoutdoor,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Modality {
    Rgb,
    Depth,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Rgb => "rgb",
            Modality::Depth => "depth",
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum BddVersion {
    #[value(name = "100k")]
    V100k,
    #[value(name = "10k")]
    V10k,
}

impl BddVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            BddVersion::V100k => "100k",
            BddVersion::V10k => "10k",
        }
    }
}

/// Id assignment for COCO output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CocoConfig {
    pub start_image_id: u64,
    pub start_annotation_id: u64,
}

impl Args {
    /// Category vocabulary for this run: `label_list` if given, else the dataset's own.
    pub fn category_map(&self) -> Result<CategoryMap> {
        if !self.label_list.is_empty() {
            return CategoryMap::new(self.label_list.iter().cloned());
        }
        Ok(match self.dataset {
            Dataset::Bdd100k => CategoryMap::bdd100k(),
            Dataset::Inoutdoor => CategoryMap::inoutdoor(),
        })
    }

    pub fn to_coco_config(&self) -> CocoConfig {
        CocoConfig {
            start_image_id: self.start_image_id,
            start_annotation_id: self.start_annotation_id,
        }
    }

    /// Output root, `default_name` relative to the working directory when unset.
    pub fn output_root(&self, default_name: &str) -> PathBuf {
        match &self.output_dir {
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(".").join(default_name),
        }
    }
}

// A cap of zero images would produce empty splits
fn validate_max_images(s: &str) -> Result<usize, String> {
    match usize::from_str(s) {
        Ok(val) if val > 0 => Ok(val),
        _ => Err("MAX_IMAGES must be a positive integer".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_max_images() {
        assert_eq!(validate_max_images("16"), Ok(16));
        assert!(validate_max_images("0").is_err());
        assert!(validate_max_images("-3").is_err());
        assert!(validate_max_images("abc").is_err());
    }

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from([
            "dataset2yolo",
            "-d",
            "/data/bdd",
            "--dataset",
            "bdd100k",
            "--bdd_version",
            "10k",
            "--max_images",
            "8",
            "car,person",
        ]);

        assert_eq!(args.dataset, Dataset::Bdd100k);
        assert_eq!(args.bdd_version, BddVersion::V10k);
        assert_eq!(args.modality, Modality::Rgb);
        assert_eq!(args.max_images, Some(8));
        assert_eq!(args.seed, 42);
        assert_eq!(args.label_list, vec!["car", "person"]);

        let categories = args.category_map().unwrap();
        assert_eq!(categories.class_index("person"), Some(1));
    }

    #[test]
    fn test_coco_config_defaults_to_zero_ids() {
        let args = Args::parse_from(["dataset2coco", "-d", "/data/bdd", "--dataset", "bdd100k"]);
        assert_eq!(args.to_coco_config(), CocoConfig::default());
        assert_eq!(
            CocoConfig::default(),
            CocoConfig {
                start_image_id: 0,
                start_annotation_id: 0,
            }
        );
    }
}
