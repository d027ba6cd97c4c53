use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::categories::CategoryMap;
use crate::error::{ConvertError, Result};
use crate::utils::absolute_path;

/// A split of the YOLO output as seen by the manifest files
#[derive(Debug, Clone)]
pub struct SplitManifest {
    pub fold: String,
    pub split_name: String,
    pub list_file: PathBuf,
}

impl SplitManifest {
    /// Key used in Darknet `.data` files: `train`, everything else is `valid`.
    pub fn data_key(&self) -> &'static str {
        if self.fold == "train" {
            "train"
        } else {
            "valid"
        }
    }
}

fn create_file(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| ConvertError::io(path, e))
}

fn write_all(path: &Path, content: &str) -> Result<()> {
    let mut writer = create_file(path)?;
    writer
        .write_all(content.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| ConvertError::io(path, e))
}

/// One category name per line, in class order.
pub fn write_names_file(path: &Path, categories: &CategoryMap) -> Result<()> {
    let mut content = String::new();
    for (_, name) in categories.iter() {
        content.push_str(name);
        content.push('\n');
    }
    write_all(path, &content)
}

/// Darknet `.data` file pointing at the split lists and the names file.
pub fn write_data_file(
    path: &Path,
    categories: &CategoryMap,
    splits: &[SplitManifest],
    names_path: &str,
    prefix: &str,
) -> Result<()> {
    let mut content = format!("classes={}\n", categories.len());
    for split in splits {
        let list_file = absolute_path(&split.list_file)?;
        content.push_str(&format!(
            "{}={}\n",
            split.data_key(),
            list_file.to_string_lossy()
        ));
    }
    content.push_str(&format!("names={}\n", names_path));
    content.push_str("backup=backup/\n");
    content.push_str(&format!("eval={}\n", prefix));
    write_all(path, &content)
}

/// Create the dataset.yaml file for YOLO training
pub fn create_dataset_yaml(
    dataset_root: &Path,
    splits: &[SplitManifest],
    categories: &CategoryMap,
) -> Result<()> {
    let split_dir = |fold: &str| {
        splits
            .iter()
            .find(|split| split.fold == fold)
            .map(|split| format!("images/{}", split.split_name))
    };
    let train = split_dir("train").unwrap_or_default();
    let test = split_dir("test");
    let val = split_dir("val").or_else(|| test.clone()).unwrap_or_default();

    let absolute_path = absolute_path(dataset_root)?;
    let mut yaml_content = format!(
        "path: {}\ntrain: {}\nval: {}\n",
        absolute_path.to_string_lossy(),
        train,
        val
    );
    match test {
        Some(test) => yaml_content.push_str(&format!("test: {}\n", test)),
        None => yaml_content.push_str("test:\n"),
    }
    yaml_content.push_str("\nnames:\n");
    for (id, label) in categories.iter() {
        yaml_content.push_str(&format!("    {}: {}\n", id, label));
    }

    write_all(&dataset_root.join("dataset.yaml"), &yaml_content)
}

/// Per-split list of absolute image paths, one per line.
pub struct ImageListWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    entries: usize,
}

impl ImageListWriter {
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            writer: create_file(path)?,
            entries: 0,
        })
    }

    pub fn push(&mut self, image: &Path) -> Result<()> {
        let image = absolute_path(image)?;
        writeln!(self.writer, "{}", image.to_string_lossy())
            .map_err(|e| ConvertError::io(&self.path, e))?;
        self.entries += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<usize> {
        self.writer
            .flush()
            .map_err(|e| ConvertError::io(&self.path, e))?;
        Ok(self.entries)
    }
}

/// Serialize a document as compact JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = create_file(path)?;
    serde_json::to_writer(&mut writer, value).map_err(|source| ConvertError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|e| ConvertError::io(path, e))
}
