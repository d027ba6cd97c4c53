use indexmap::IndexSet;

use crate::error::{ConvertError, Result};

pub const BDD100K_LABELS: &[&str] = &[
    "bus",
    "traffic light",
    "traffic sign",
    "person",
    "bike",
    "truck",
    "motor",
    "car",
    "train",
    "rider",
];

pub const INOUTDOOR_LABELS: &[&str] = &["person"];

/// Ordered category vocabulary shared by the writers.
///
/// The position of a name is its YOLO class index; COCO category ids are the
/// same position plus one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMap {
    names: IndexSet<String>,
}

impl CategoryMap {
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = IndexSet::new();
        for name in names {
            let name = name.into();
            if !set.insert(name.clone()) {
                return Err(ConvertError::InvalidCategories(format!(
                    "duplicate category `{}`",
                    name
                )));
            }
        }

        if set.is_empty() {
            return Err(ConvertError::InvalidCategories(
                "at least one category is required".to_string(),
            ));
        }

        Ok(Self { names: set })
    }

    pub fn bdd100k() -> Self {
        Self::from_static(BDD100K_LABELS)
    }

    pub fn inoutdoor() -> Self {
        Self::from_static(INOUTDOOR_LABELS)
    }

    fn from_static(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// 0-based class index
    pub fn class_index(&self, name: &str) -> Option<usize> {
        self.names.get_index_of(name)
    }

    /// 1-based COCO category id
    pub fn category_id(&self, name: &str) -> Option<u32> {
        self.class_index(name).map(|index| index as u32 + 1)
    }

    pub fn name(&self, class_index: usize) -> Option<&str> {
        self.names.get_index(class_index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `(class_index, name)` pairs in class order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().map(String::as_str).enumerate()
    }
}
