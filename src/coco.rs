//! COCO format data structures and utilities
//!
//! Instances documents for object detection: images, categories and one
//! annotation per box with a top-left anchored pixel `bbox`.

use serde::{Deserialize, Serialize};
use std::mem;

use crate::boxes::BoundingBox;
use crate::categories::CategoryMap;
use crate::config::CocoConfig;

/// COCO dataset information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub description: String,
    pub url: String,
    pub version: String,
    pub year: u32,
    pub contributor: String,
    pub date_created: String,
}

impl Info {
    pub fn new(url: &str, year: u32, contributor: &str) -> Self {
        Self {
            description: String::new(),
            url: url.to_string(),
            version: "v1.0".to_string(),
            year,
            contributor: contributor.to_string(),
            date_created: chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        }
    }
}

/// COCO license information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub url: String,
    pub id: u32,
    pub name: String,
}

impl License {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            url: String::new(),
            id,
            name: name.to_string(),
        }
    }
}

/// COCO category information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub supercategory: String,
}

/// COCO image information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub license: u32,
    pub url: String,
    pub file_name: String,
    pub height: u32,
    pub width: u32,
    pub date_captured: String,
    pub id: u64,
}

/// COCO annotation information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub segmentation: Vec<Vec<f64>>,
    pub area: f64,
    pub iscrowd: u32,
    pub image_id: u64,
    pub id: u64,
    pub category_id: u32,
    pub bbox: [f64; 4], // [x, y, width, height]
}

/// Complete COCO dataset structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoFile {
    pub info: Info,
    pub licenses: Vec<License>,
    pub images: Vec<Image>,
    #[serde(rename = "type")]
    pub kind: String,
    pub annotations: Vec<Annotation>,
    pub categories: Vec<Category>,
}

/// Accumulates one split at a time.
///
/// Image ids restart at `start_image_id` for every split; annotation ids keep
/// increasing across splits so they stay unique for the whole run.
pub struct CocoWriter {
    config: CocoConfig,
    info: Info,
    license: License,
    categories: Vec<Category>,
    images: Vec<Image>,
    annotations: Vec<Annotation>,
    next_image_id: u64,
    next_annotation_id: u64,
}

impl CocoWriter {
    pub fn new(config: CocoConfig, info: Info, license: License, categories: &CategoryMap) -> Self {
        let categories = categories
            .iter()
            .map(|(index, name)| Category {
                id: index as u32 + 1, // COCO uses 1-based indexing
                name: name.to_string(),
                supercategory: "none".to_string(),
            })
            .collect();

        Self {
            next_image_id: config.start_image_id,
            next_annotation_id: config.start_annotation_id,
            config,
            info,
            license,
            categories,
            images: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Add an image to the current split and return its id
    pub fn add_image(&mut self, file_name: String, width: u32, height: u32) -> u64 {
        let image_id = self.next_image_id;
        self.next_image_id += 1;
        self.images.push(Image {
            license: self.license.id,
            url: String::new(),
            file_name,
            height,
            width,
            date_captured: chrono::Local::now().format("%Y-%m-%d %H:%M:00").to_string(),
            id: image_id,
        });
        image_id
    }

    /// Add a box labelled with its 0-based class index and return the annotation id
    pub fn add_annotation(&mut self, image_id: u64, bbox: &BoundingBox<usize>) -> u64 {
        let annotation_id = self.next_annotation_id;
        self.next_annotation_id += 1;
        self.annotations.push(Annotation {
            segmentation: Vec::new(),
            area: bbox.area(),
            iscrowd: 0,
            image_id,
            id: annotation_id,
            category_id: *bbox.label() as u32 + 1,
            bbox: bbox.to_top_left_size(None),
        });
        annotation_id
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    /// Close the current split and return its document.
    pub fn finish_split(&mut self) -> CocoFile {
        self.next_image_id = self.config.start_image_id;
        CocoFile {
            info: self.info.clone(),
            licenses: vec![self.license.clone()],
            images: mem::take(&mut self.images),
            kind: "instances".to_string(),
            annotations: mem::take(&mut self.annotations),
            categories: self.categories.clone(),
        }
    }
}
