use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Invalid box geometry: x [{xmin}, {xmax}], y [{ymin}, {ymax}]")]
    InvalidGeometry {
        xmin: f64,
        xmax: f64,
        ymin: f64,
        ymax: f64,
    },
    #[error("Invalid normalization size {width}x{height}: both sides must be positive")]
    InvalidNormalization { width: f64, height: f64 },
    #[error("Invalid category list: {0}")]
    InvalidCategories(String),
    #[error("Required directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),
    #[error("Output directory {} would overwrite the source dataset", .0.display())]
    OutputOverlapsSource(PathBuf),
    #[error("Missing field `{field}` in {}", .path.display())]
    MissingField { path: PathBuf, field: &'static str },
    #[error("Invalid value `{value}` for `{field}` in {}", .path.display())]
    InvalidValue {
        path: PathBuf,
        field: &'static str,
        value: String,
    },
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse JSON ({}): {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to parse YAML ({}): {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Failed to parse XML ({}): {source}", .path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: serde_xml_rs::Error,
    },
    #[error("Image error ({}): {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
