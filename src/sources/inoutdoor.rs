//! InOutDoorPeopleRGBD reader
//!
//! Splits are defined by sequence lists in `ImageSets/`. Each frame has a
//! `<stem>.png` image and an `Annotations/<stem>.yml` record; Pascal-VOC style
//! `<stem>.xml` records are read when no YAML record exists.
//!
//! XML records must list their `<object>` elements back to back: a record with
//! another element (such as `<size>`) between two objects fails to parse and
//! the frame is skipped. The YAML records have no such restriction.

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::Modality;
use crate::error::{ConvertError, Result};
use crate::types::{FoldListing, FramePaths, FrameAnnotation, RawObject, SkipReason, SkippedRecord};

pub const FOLDS: &[&str] = &["train", "test"];
pub const YEAR: u32 = 2015;
pub const PREFIX: &str = "inoutdoor";
pub const REQUIRED_DIRS: &[&str] = &["Annotations", "ImageSets", "ImagesQhd", "DepthJetQhd"];

/// Sequence lists making up each split.
pub fn fold_sets(fold: &str) -> &'static [&'static str] {
    match fold {
        "train" => &["seq0.txt", "seq1.txt", "seq2.txt"],
        "test" => &["seq3.txt"],
        _ => &[],
    }
}

pub fn image_dir(root: &Path, modality: Modality) -> PathBuf {
    match modality {
        Modality::Rgb => root.join("ImagesQhd"),
        Modality::Depth => root.join("DepthJetQhd"),
    }
}

pub fn required_dirs(root: &Path) -> Vec<PathBuf> {
    REQUIRED_DIRS.iter().map(|dir| root.join(dir)).collect()
}

/// Frame stems listed by the given sequence files, sorted and deduplicated.
pub fn read_image_sets(image_set_dir: &Path, set_files: &[&str]) -> Result<Vec<String>> {
    let mut stems = Vec::new();
    for set_file in set_files {
        let path = image_set_dir.join(set_file);
        let content = fs::read_to_string(&path).map_err(|e| ConvertError::io(&path, e))?;
        stems.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }
    stems.sort();
    stems.dedup();
    Ok(stems)
}

pub fn list_fold(root: &Path, modality: Modality, fold: &str) -> Result<FoldListing> {
    let stems = read_image_sets(&root.join("ImageSets"), fold_sets(fold))?;
    let images_dir = image_dir(root, modality);
    let annotations_dir = root.join("Annotations");

    let mut listing = FoldListing::default();
    for stem in stems {
        let image = images_dir.join(format!("{}.png", stem));
        if !image.is_file() {
            listing
                .skipped
                .push(SkippedRecord::new(image, SkipReason::MissingImage));
            continue;
        }

        let label = ["yml", "yaml", "xml"]
            .iter()
            .map(|ext| annotations_dir.join(format!("{}.{}", stem, ext)))
            .find(|candidate| candidate.is_file());
        match label {
            Some(label) => listing.frames.push(FramePaths { stem, image, label }),
            None => listing
                .skipped
                .push(SkippedRecord::new(image, SkipReason::MissingLabel)),
        }
    }
    Ok(listing)
}

pub fn read_label_file(path: &Path) -> Result<FrameAnnotation> {
    let content = fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("xml") => parse_xml(&content, path),
        _ => parse_yaml(&content, path),
    }
}

// Numbers are stored either as scalars or as numeric strings
fn de_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct NumberVisitor;

    impl<'de> Visitor<'de> for NumberVisitor {
        type Value = f64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or a numeric string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            f64::from_str(v.trim()).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(NumberVisitor)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

#[derive(Debug, Deserialize)]
struct YamlRecord {
    annotation: YamlAnnotation,
}

#[derive(Debug, Deserialize)]
struct YamlAnnotation {
    size: Option<YamlSize>,
    object: Option<OneOrMany<YamlObject>>,
}

#[derive(Debug, Deserialize)]
struct YamlSize {
    #[serde(deserialize_with = "de_number")]
    width: f64,
    #[serde(deserialize_with = "de_number")]
    height: f64,
}

#[derive(Debug, Deserialize)]
struct YamlObject {
    #[serde(default)]
    name: String,
    bndbox: Option<YamlBndBox>,
}

#[derive(Debug, Deserialize)]
struct YamlBndBox {
    #[serde(deserialize_with = "de_number")]
    xmin: f64,
    #[serde(deserialize_with = "de_number")]
    ymin: f64,
    #[serde(deserialize_with = "de_number")]
    xmax: f64,
    #[serde(deserialize_with = "de_number")]
    ymax: f64,
}

pub fn parse_yaml(content: &str, path: &Path) -> Result<FrameAnnotation> {
    let record: YamlRecord = serde_yaml::from_str(content).map_err(|source| ConvertError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;

    let objects = match record.annotation.object {
        Some(OneOrMany::One(object)) => vec![object],
        Some(OneOrMany::Many(objects)) => objects,
        None => Vec::new(),
    };

    Ok(FrameAnnotation {
        objects: objects
            .into_iter()
            .filter_map(|object| {
                object.bndbox.map(|b| RawObject {
                    xmin: b.xmin,
                    xmax: b.xmax,
                    ymin: b.ymin,
                    ymax: b.ymax,
                    category: object.name,
                })
            })
            .collect(),
        image_size: record
            .annotation
            .size
            .map(|size| (to_pixels(size.width), to_pixels(size.height))),
    })
}

#[derive(Debug, Deserialize)]
struct XmlAnnotation {
    size: Option<XmlSize>,
    #[serde(rename = "object", default)]
    objects: Vec<XmlObject>,
}

#[derive(Debug, Deserialize)]
struct XmlSize {
    width: String,
    height: String,
}

#[derive(Debug, Deserialize)]
struct XmlObject {
    #[serde(default)]
    name: String,
    bndbox: Option<XmlBndBox>,
}

#[derive(Debug, Deserialize)]
struct XmlBndBox {
    xmin: String,
    ymin: String,
    xmax: String,
    ymax: String,
}

pub fn parse_xml(content: &str, path: &Path) -> Result<FrameAnnotation> {
    let record: XmlAnnotation =
        serde_xml_rs::from_str(content).map_err(|source| ConvertError::Xml {
            path: path.to_path_buf(),
            source,
        })?;

    let number = |field: &'static str, value: &str| -> Result<f64> {
        f64::from_str(value.trim()).map_err(|_| ConvertError::InvalidValue {
            path: path.to_path_buf(),
            field,
            value: value.to_string(),
        })
    };

    let mut objects = Vec::with_capacity(record.objects.len());
    for object in record.objects {
        if let Some(b) = object.bndbox {
            objects.push(RawObject {
                xmin: number("xmin", &b.xmin)?,
                xmax: number("xmax", &b.xmax)?,
                ymin: number("ymin", &b.ymin)?,
                ymax: number("ymax", &b.ymax)?,
                category: object.name,
            });
        }
    }

    let image_size = match record.size {
        Some(size) => Some((
            to_pixels(number("width", &size.width)?),
            to_pixels(number("height", &size.height)?),
        )),
        None => None,
    };

    Ok(FrameAnnotation {
        objects,
        image_size,
    })
}

fn to_pixels(value: f64) -> u32 {
    value.round().max(0.0) as u32
}
