//! Berkeley DeepDrive (BDD100K) reader
//!
//! Images live in `images/<version>/<fold>/` and labels in
//! `labels/<version>/<fold>/`, one JSON document per frame.

use log::debug;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::config::BddVersion;
use crate::error::{ConvertError, Result};
use crate::types::{FoldListing, FrameAnnotation, RawObject, IMG_FORMATS};
use crate::utils::{list_files_with_extensions, pair_by_stem};

pub const FOLDS: &[&str] = &["train", "val"];
pub const YEAR: u32 = 2017;
pub const PREFIX: &str = "deepdrive";

#[derive(Debug, Deserialize)]
struct LabelFile {
    frames: Option<Vec<Frame>>,
}

#[derive(Debug, Deserialize)]
struct Frame {
    #[serde(default)]
    objects: Vec<Object>,
}

#[derive(Debug, Deserialize)]
struct Object {
    #[serde(default)]
    category: String,
    box2d: Option<Box2d>,
}

#[derive(Debug, Deserialize)]
struct Box2d {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

pub fn image_dir(root: &Path, version: BddVersion, fold: &str) -> PathBuf {
    root.join("images").join(version.as_str()).join(fold)
}

pub fn label_dir(root: &Path, version: BddVersion, fold: &str) -> PathBuf {
    root.join("labels").join(version.as_str()).join(fold)
}

pub fn required_dirs(root: &Path) -> Vec<PathBuf> {
    vec![root.join("images"), root.join("labels")]
}

/// Pair the images of `fold` with their JSON labels.
pub fn list_fold(root: &Path, version: BddVersion, fold: &str) -> Result<FoldListing> {
    let images = list_files_with_extensions(&image_dir(root, version, fold), IMG_FORMATS)?;
    let labels = list_files_with_extensions(&label_dir(root, version, fold), &["json"])?;
    Ok(pair_by_stem(images, labels))
}

pub fn read_label_file(path: &Path) -> Result<FrameAnnotation> {
    let file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
    let label: LabelFile =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ConvertError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    into_frame_annotation(label, path)
}

pub fn parse_label(content: &str, path: &Path) -> Result<FrameAnnotation> {
    let label: LabelFile = serde_json::from_str(content).map_err(|source| ConvertError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    into_frame_annotation(label, path)
}

// Only the first frame carries the per-image boxes
fn into_frame_annotation(label: LabelFile, path: &Path) -> Result<FrameAnnotation> {
    let frame = label
        .frames
        .and_then(|frames| frames.into_iter().next())
        .ok_or_else(|| ConvertError::MissingField {
            path: path.to_path_buf(),
            field: "frames",
        })?;

    let mut objects = Vec::with_capacity(frame.objects.len());
    for object in frame.objects {
        match object.box2d {
            Some(Box2d { x1, y1, x2, y2 }) => objects.push(RawObject {
                xmin: x1,
                xmax: x2,
                ymin: y1,
                ymax: y2,
                category: object.category,
            }),
            None => debug!(
                "Ignoring `{}` without box2d in {}",
                object.category,
                path.display()
            ),
        }
    }

    Ok(FrameAnnotation {
        objects,
        image_size: None,
    })
}
