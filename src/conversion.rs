use crate::boxes::{BoundingBox, Normalization};
use crate::categories::CategoryMap;
use crate::error::Result;
use crate::types::{FrameAnnotation, RawObject, SkipReason};

/// YOLO label file contents for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YoloLabel {
    pub text: String,
    pub boxes: usize,
    pub skipped: Vec<SkipReason>,
}

/// Validate one raw object into a box labelled with its 0-based class index.
///
/// Objects outside the vocabulary yield `Ok(None)`.
pub fn object_to_box(
    object: &RawObject,
    categories: &CategoryMap,
) -> Result<Option<BoundingBox<usize>>> {
    let Some(class_index) = categories.class_index(&object.category) else {
        return Ok(None);
    };
    BoundingBox::new(object.xmin, object.xmax, object.ymin, object.ymax, class_index).map(Some)
}

/// Boxes of a frame that survive validation, plus why the others did not.
pub fn collect_boxes(
    annotation: &FrameAnnotation,
    categories: &CategoryMap,
) -> (Vec<BoundingBox<usize>>, Vec<SkipReason>) {
    let mut boxes = Vec::with_capacity(annotation.objects.len());
    let mut skipped = Vec::new();

    for object in &annotation.objects {
        match object_to_box(object, categories) {
            Ok(Some(bbox)) => boxes.push(bbox),
            Ok(None) => skipped.push(SkipReason::UnknownCategory(object.category.clone())),
            Err(e) => skipped.push(SkipReason::InvalidBox(e.to_string())),
        }
    }

    (boxes, skipped)
}

/// `<class> <cx> <cy> <w> <h>` with all coordinates normalized.
pub fn yolo_line(bbox: &BoundingBox<usize>, normalization: Normalization) -> String {
    let [x_center, y_center, width, height] = bbox.to_center_size(Some(normalization));
    format!(
        "{} {:.6} {:.6} {:.6} {:.6}\n",
        bbox.label(),
        x_center,
        y_center,
        width,
        height
    )
}

/// Convert an annotation to YOLO bounding-box lines
pub fn convert_to_yolo_format(
    annotation: &FrameAnnotation,
    categories: &CategoryMap,
    normalization: Normalization,
) -> YoloLabel {
    let (boxes, skipped) = collect_boxes(annotation, categories);

    let mut text = String::with_capacity(boxes.len() * 48);
    for bbox in &boxes {
        text.push_str(&yolo_line(bbox, normalization));
    }

    YoloLabel {
        text,
        boxes: boxes.len(),
        skipped,
    }
}
