//! YOLO dataset processing module
//!
//! Frames left without any box after category filtering are dropped from the
//! images, labels and list files for every source, BDD100K included. Pass
//! `--include_background` to keep them with an empty label file, which lists
//! every paired frame the way the BDD100K tooling does.

use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::boxes::Normalization;
use crate::categories::CategoryMap;
use crate::config::Args;
use crate::conversion::convert_to_yolo_format;
use crate::error::{ConvertError, Result};
use crate::io::{
    create_dataset_yaml, write_data_file, write_names_file, ImageListWriter, SplitManifest,
};
use crate::sources::{select_frames, DatasetProfile};
use crate::types::{FramePaths, ProcessingStats, SkipReason};
use crate::utils::{
    create_output_directory, create_progress_bar, ensure_output_outside_source,
    read_image_dimensions, transfer_image,
};

/// Output directories of one split
#[derive(Debug, Clone)]
pub struct SplitDirs {
    pub fold: String,
    pub split_name: String,
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
    pub list_file: PathBuf,
}

/// Struct to hold the paths to the output directories of a YOLO dataset
#[derive(Debug, Clone)]
pub struct YoloOutputDirs {
    pub output_root: PathBuf,
    /// `output_root`, or its modality sub-directory
    pub dataset_root: PathBuf,
    pub data_dir: PathBuf,
    pub splits: Vec<SplitDirs>,
}

enum FrameOutcome {
    Written {
        image: PathBuf,
        boxes: usize,
        object_skips: Vec<SkipReason>,
    },
    Skipped {
        reason: SkipReason,
        object_skips: Vec<SkipReason>,
    },
}

/// Set up the directory structure for YOLO dataset output
pub fn setup_output_directories(args: &Args, profile: &DatasetProfile) -> Result<YoloOutputDirs> {
    let output_root = args.output_root(&format!("{}_yolo", profile.prefix));
    ensure_output_outside_source(&output_root, &profile.root)?;
    let (dataset_root, data_dir) = match profile.modality_dir() {
        Some(modality) => (
            output_root.join(modality),
            output_root.join("data").join(modality),
        ),
        None => (output_root.clone(), output_root.join("data")),
    };

    let data_dir = create_output_directory(&data_dir)?;
    let images_dir = create_output_directory(&dataset_root.join("images"))?;
    let labels_dir = create_output_directory(&dataset_root.join("labels"))?;

    let mut splits = Vec::with_capacity(profile.folds.len());
    for fold in profile.folds {
        let split_name = profile.split_name(fold);
        splits.push(SplitDirs {
            fold: fold.to_string(),
            images_dir: create_output_directory(&images_dir.join(&split_name))?,
            labels_dir: create_output_directory(&labels_dir.join(&split_name))?,
            list_file: data_dir.join(format!("{}_{}.txt", profile.prefix, split_name)),
            split_name,
        });
    }

    Ok(YoloOutputDirs {
        output_root,
        dataset_root,
        data_dir,
        splits,
    })
}

/// Main YOLO dataset processing pipeline
pub fn process_dataset(
    output_dirs: &YoloOutputDirs,
    args: &Args,
    profile: &DatasetProfile,
    categories: &CategoryMap,
) -> Result<ProcessingStats> {
    let mut stats = ProcessingStats::new();

    for split in &output_dirs.splits {
        info!("Writing {}", split.split_name);
        stats.merge(process_split(split, args, profile, categories)?);
    }

    let names_file = format!("{}.names", profile.prefix);
    let names_path = match profile.modality_dir() {
        Some(modality) => format!("data/{}/{}", modality, names_file),
        None => format!("data/{}", names_file),
    };
    write_names_file(&output_dirs.data_dir.join(&names_file), categories)?;

    let manifests: Vec<SplitManifest> = output_dirs
        .splits
        .iter()
        .map(|split| SplitManifest {
            fold: split.fold.clone(),
            split_name: split.split_name.clone(),
            list_file: split.list_file.clone(),
        })
        .collect();
    write_data_file(
        &output_dirs
            .data_dir
            .join(format!("{}.data", profile.prefix)),
        categories,
        &manifests,
        &names_path,
        profile.prefix,
    )?;

    info!("Creating dataset.yaml file...");
    create_dataset_yaml(&output_dirs.dataset_root, &manifests, categories)?;

    stats.print_summary();
    Ok(stats)
}

fn process_split(
    split: &SplitDirs,
    args: &Args,
    profile: &DatasetProfile,
    categories: &CategoryMap,
) -> Result<ProcessingStats> {
    let mut stats = ProcessingStats::new();

    let listing = profile.list_fold(&split.fold)?;
    stats.extend_skipped(listing.skipped);
    let frames = select_frames(listing.frames, args.max_images, args.shuffle, args.seed);

    let pb = create_progress_bar(frames.len() as u64, &split.split_name);
    let mut image_list = ImageListWriter::create(&split.list_file)?;

    for frame in &frames {
        stats.increment_total();
        match convert_frame(frame, split, args, profile, categories) {
            Ok(FrameOutcome::Written {
                image,
                boxes,
                object_skips,
            }) => {
                image_list.push(&image)?;
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

    let entries = image_list.finish()?;
    info!("Listed {} images in {}", entries, split.list_file.display());
    Ok(stats)
}

fn convert_frame(
    frame: &FramePaths,
    split: &SplitDirs,
    args: &Args,
    profile: &DatasetProfile,
    categories: &CategoryMap,
) -> Result<FrameOutcome> {
    let annotation = profile.read_frame(frame)?;
    let (width, height) = match annotation.image_size {
        Some(size) => size,
        None => read_image_dimensions(&frame.image)?,
    };

    let Ok(normalization) = Normalization::from_image_size(width, height) else {
        return Ok(FrameOutcome::Skipped {
            reason: SkipReason::EmptyImage { width, height },
            object_skips: Vec::new(),
        });
    };

    let label = convert_to_yolo_format(&annotation, categories, normalization);
    if label.boxes == 0 && !args.include_background {
        return Ok(FrameOutcome::Skipped {
            reason: SkipReason::NoObjects,
            object_skips: label.skipped,
        });
    }

    let output_stem = format!("{}_{}_{}", profile.prefix, split.split_name, frame.stem);
    let image_output_path = split
        .images_dir
        .join(profile.image_transfer.file_name(&frame.image, &output_stem));
    transfer_image(&frame.image, &image_output_path, profile.image_transfer)?;

    let label_output_path = split
        .labels_dir
        .join(sanitize_filename::sanitize(format!("{}.txt", output_stem)));
    write_label_file(&label_output_path, &label.text)?;

    Ok(FrameOutcome::Written {
        image: image_output_path,
        boxes: label.boxes,
        object_skips: label.skipped,
    })
}

fn write_label_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| ConvertError::io(path, e))
}
