use glob::{glob, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::sources::ImageTransfer;
use crate::types::{FoldListing, FramePaths, SkipReason, SkippedRecord};

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .progress_chars("#>-"),
    );
    pb
}

/// Safely create output directories and return their paths
///
/// An existing directory is deleted first so a rerun never mixes outputs.
pub fn create_output_directory(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        log::warn!(
            "Directory {:?} already exists. Deleting and recreating it.",
            path
        );
        fs::remove_dir_all(path).map_err(|e| ConvertError::io(path, e))?;
    }
    fs::create_dir_all(path).map_err(|e| ConvertError::io(path, e))?;
    Ok(path.to_path_buf())
}

/// Files directly inside `dir` whose extension is one of `extensions`, sorted.
pub fn list_files_with_extensions(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ConvertError::MissingDirectory(dir.to_path_buf()));
    }

    let pattern = format!("{}/*", Pattern::escape(&dir.to_string_lossy()));
    let entries = glob(&pattern).map_err(|e| ConvertError::InvalidValue {
        path: dir.to_path_buf(),
        field: "glob pattern",
        value: e.to_string(),
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file() && has_extension(path, extensions))
        .collect();
    files.sort();
    Ok(files)
}

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
}

pub fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

/// Match images to label files by file stem.
///
/// Images without a label are reported as skipped; labels without an image are
/// reported against the label path.
pub fn pair_by_stem(images: Vec<PathBuf>, labels: Vec<PathBuf>) -> FoldListing {
    let mut labels_by_stem: HashMap<String, PathBuf> = labels
        .into_iter()
        .filter_map(|label| file_stem(&label).map(|stem| (stem, label)))
        .collect();

    let mut listing = FoldListing::default();
    for image in images {
        let Some(stem) = file_stem(&image) else {
            listing
                .skipped
                .push(SkippedRecord::new(image, SkipReason::MissingLabel));
            continue;
        };
        match labels_by_stem.remove(&stem) {
            Some(label) => listing.frames.push(FramePaths { stem, image, label }),
            None => listing
                .skipped
                .push(SkippedRecord::new(image, SkipReason::MissingLabel)),
        }
    }

    let mut orphans: Vec<PathBuf> = labels_by_stem.into_values().collect();
    orphans.sort();
    listing.skipped.extend(
        orphans
            .into_iter()
            .map(|label| SkippedRecord::new(label, SkipReason::MissingImage)),
    );

    listing.frames.sort();
    listing
}

/// Read `(width, height)` from the image header.
pub fn read_image_dimensions(path: &Path) -> Result<(u32, u32)> {
    image::image_dimensions(path).map_err(|source| ConvertError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a source image to `destination` using the dataset's transfer mode.
pub fn transfer_image(source: &Path, destination: &Path, mode: ImageTransfer) -> Result<()> {
    match mode {
        ImageTransfer::Copy => {
            fs::copy(source, destination).map_err(|e| ConvertError::io(destination, e))?;
        }
        ImageTransfer::ReencodeJpeg => {
            let decoded = image::open(source).map_err(|source_err| ConvertError::Image {
                path: source.to_path_buf(),
                source: source_err,
            })?;
            decoded
                .to_rgb8()
                .save_with_format(destination, image::ImageFormat::Jpeg)
                .map_err(|source_err| ConvertError::Image {
                    path: destination.to_path_buf(),
                    source: source_err,
                })?;
        }
    }
    Ok(())
}

/// Absolute form of a path whose trailing components may not exist yet.
///
/// The longest existing prefix is canonicalized and the rest is appended as is.
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| ConvertError::io(path, e))?
            .join(path)
    };

    let mut missing = Vec::new();
    let mut existing = path.as_path();
    while !existing.exists() {
        match (existing.file_name(), existing.parent()) {
            (Some(name), Some(parent)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }

    let mut resolved = absolute_path(existing)?;
    for name in missing.into_iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}

/// Refuse an output root that is the source root or one of its ancestors.
///
/// Output setup deletes directories such as `images/` and `labels/`, which
/// would otherwise wipe the source tree before it is read.
pub fn ensure_output_outside_source(output_root: &Path, source_root: &Path) -> Result<()> {
    let output = resolve_path(output_root)?;
    let source = resolve_path(source_root)?;
    if source.starts_with(&output) {
        return Err(ConvertError::OutputOverlapsSource(output_root.to_path_buf()));
    }
    Ok(())
}

/// Absolute form of a path that already exists.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|e| ConvertError::io(path, e))
}
