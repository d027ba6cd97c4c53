//! COCO dataset processing module
//!
//! Copies or re-encodes every kept image into `<fold><year>/` and writes one
//! `annotations/instances_<fold><year>.json` document per split.
//!
//! As for YOLO output, frames without boxes are left out of `images[]` unless
//! `--include_background` is given; with it, every paired frame is listed.

use log::info;
use std::path::PathBuf;

use crate::categories::CategoryMap;
use crate::coco::CocoWriter;
use crate::config::{Args, CocoConfig};
use crate::conversion::collect_boxes;
use crate::error::Result;
use crate::io::write_json;
use crate::sources::{select_frames, DatasetProfile};
use crate::types::{FramePaths, ProcessingStats, SkipReason};
use crate::utils::{
    create_output_directory, create_progress_bar, ensure_output_outside_source,
    read_image_dimensions, transfer_image,
};

/// Output locations of one COCO split
#[derive(Debug, Clone)]
pub struct CocoSplitDirs {
    pub fold: String,
    pub split_name: String,
    pub images_dir: PathBuf,
    pub annotation_file: PathBuf,
}

/// Struct to hold the paths to the output directories for COCO dataset
#[derive(Debug, Clone)]
pub struct CocoOutputDirs {
    pub dataset_root: PathBuf,
    pub annotations_dir: PathBuf,
    pub splits: Vec<CocoSplitDirs>,
}

enum FrameOutcome {
    Written {
        boxes: usize,
        object_skips: Vec<SkipReason>,
    },
    Skipped {
        reason: SkipReason,
        object_skips: Vec<SkipReason>,
    },
}

/// Set up the directory structure for COCO dataset output
pub fn setup_coco_output_directories(
    args: &Args,
    profile: &DatasetProfile,
) -> Result<CocoOutputDirs> {
    let output_root = args.output_root(profile.prefix);
    ensure_output_outside_source(&output_root, &profile.root)?;
    let dataset_root = match profile.modality_dir() {
        Some(modality) => output_root.join(modality),
        None => output_root,
    };
    let annotations_dir = create_output_directory(&dataset_root.join("annotations"))?;

    let mut splits = Vec::with_capacity(profile.folds.len());
    for fold in profile.folds {
        let split_name = profile.split_name(fold);
        splits.push(CocoSplitDirs {
            fold: fold.to_string(),
            images_dir: create_output_directory(&dataset_root.join(&split_name))?,
            annotation_file: annotations_dir.join(format!("instances_{}.json", split_name)),
            split_name,
        });
    }

    Ok(CocoOutputDirs {
        dataset_root,
        annotations_dir,
        splits,
    })
}

/// Main COCO dataset processing pipeline
pub fn process_coco_dataset(
    output_dirs: &CocoOutputDirs,
    args: &Args,
    profile: &DatasetProfile,
    categories: &CategoryMap,
    coco_config: CocoConfig,
) -> Result<ProcessingStats> {
    let mut writer = CocoWriter::new(
        coco_config,
        profile.coco_info(),
        profile.coco_license(),
        categories,
    );
    let mut stats = ProcessingStats::new();

    for split in &output_dirs.splits {
        info!("Writing {}", split.split_name);
        stats.merge(process_split(split, args, profile, categories, &mut writer)?);

        let coco_file = writer.finish_split();
        write_json(&split.annotation_file, &coco_file)?;
        info!(
            "Wrote {} ({} images, {} annotations)",
            split.annotation_file.display(),
            coco_file.images.len(),
            coco_file.annotations.len()
        );
    }

    stats.print_summary();
    Ok(stats)
}

fn process_split(
    split: &CocoSplitDirs,
    args: &Args,
    profile: &DatasetProfile,
    categories: &CategoryMap,
    writer: &mut CocoWriter,
) -> Result<ProcessingStats> {
    let mut stats = ProcessingStats::new();

    let listing = profile.list_fold(&split.fold)?;
    stats.extend_skipped(listing.skipped);
    let frames = select_frames(listing.frames, args.max_images, args.shuffle, args.seed);

    let pb = create_progress_bar(frames.len() as u64, &split.split_name);
    for frame in &frames {
        stats.increment_total();
        match convert_frame(frame, split, args, profile, categories, writer) {
            Ok(FrameOutcome::Written {
                boxes,
                object_skips,
            }) => {
                stats.increment_converted(boxes);
                for reason in object_skips {
                    stats.record_skip(&frame.label, reason);
                }
            }
            Ok(FrameOutcome::Skipped {
                reason,
                object_skips,
            }) => {
                for reason in object_skips {
                    stats.record_skip(&frame.label, reason);
                }
                stats.record_skip(&frame.image, reason);
            }
            Err(e) => stats.record_skip(&frame.label, SkipReason::Failed(e.to_string())),
        }
        pb.inc(1);
    }
    pb.finish_with_message(format!("{} processing complete", split.split_name));

    Ok(stats)
}

fn convert_frame(
    frame: &FramePaths,
    split: &CocoSplitDirs,
    args: &Args,
    profile: &DatasetProfile,
    categories: &CategoryMap,
    writer: &mut CocoWriter,
) -> Result<FrameOutcome> {
    let annotation = profile.read_frame(frame)?;
    let (boxes, object_skips) = collect_boxes(&annotation, categories);
    if boxes.is_empty() && !args.include_background {
        return Ok(FrameOutcome::Skipped {
            reason: SkipReason::NoObjects,
            object_skips,
        });
    }

    let (width, height) = match annotation.image_size {
        Some(size) => size,
        None => read_image_dimensions(&frame.image)?,
    };

    let file_name = profile.image_transfer.file_name(&frame.image, &frame.stem);
    transfer_image(
        &frame.image,
        &split.images_dir.join(&file_name),
        profile.image_transfer,
    )?;

    let image_id = writer.add_image(file_name, width, height);
    for bbox in &boxes {
        writer.add_annotation(image_id, bbox);
    }

    Ok(FrameOutcome::Written {
        boxes: boxes.len(),
        object_skips,
    })
}
