//! Axis-aligned bounding boxes and their output encodings
//!
//! A [`BoundingBox`] is stored once in corner form (pixel units, top-left origin,
//! y pointing down) and derives every encoding the writers need. Rounding is left
//! to the writers.

use crate::error::{ConvertError, Result};

/// Image extent used to express pixel coordinates as fractions of the image.
///
/// Both sides are strictly positive, so dividing by them never fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    width: f64,
    height: f64,
}

impl Normalization {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Ok(Self { width, height })
        } else {
            Err(ConvertError::InvalidNormalization { width, height })
        }
    }

    /// Normalization for a decoded image of `width` x `height` pixels.
    pub fn from_image_size(width: u32, height: u32) -> Result<Self> {
        Self::new(width as f64, height as f64)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    // x components are divided by the width, y components by the height
    fn apply(&self, [x0, y0, x1, y1]: [f64; 4]) -> [f64; 4] {
        [
            x0 / self.width,
            y0 / self.height,
            x1 / self.width,
            y1 / self.height,
        ]
    }
}

/// Numeric input accepted for box coordinates.
pub trait Coordinate: Copy {
    fn to_f64(self) -> f64;
}

macro_rules! impl_coordinate {
    ($($t:ty),*) => {
        $(
            impl Coordinate for $t {
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_coordinate!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// An immutable axis-aligned box with an opaque label.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox<L> {
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
    label: L,
}

impl<L> BoundingBox<L> {
    /// Build a box from its corner coordinates.
    ///
    /// Zero-area boxes are accepted. `xmin > xmax` or `ymin > ymax` (and NaN
    /// coordinates, which satisfy no ordering) fail with
    /// [`ConvertError::InvalidGeometry`].
    pub fn new(
        xmin: impl Coordinate,
        xmax: impl Coordinate,
        ymin: impl Coordinate,
        ymax: impl Coordinate,
        label: L,
    ) -> Result<Self> {
        let (xmin, xmax, ymin, ymax) = (xmin.to_f64(), xmax.to_f64(), ymin.to_f64(), ymax.to_f64());

        if !(xmin <= xmax && ymin <= ymax) {
            return Err(ConvertError::InvalidGeometry {
                xmin,
                xmax,
                ymin,
                ymax,
            });
        }

        Ok(Self {
            xmin,
            xmax,
            ymin,
            ymax,
            label,
        })
    }

    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    pub fn ymin(&self) -> f64 {
        self.ymin
    }

    pub fn ymax(&self) -> f64 {
        self.ymax
    }

    pub fn label(&self) -> &L {
        &self.label
    }

    /// `(width, height)`, never negative.
    pub fn dimensions(&self) -> (f64, f64) {
        (self.xmax - self.xmin, self.ymax - self.ymin)
    }

    pub fn area(&self) -> f64 {
        let (width, height) = self.dimensions();
        width * height
    }

    /// `[xmin, ymin, xmax, ymax]`
    pub fn to_corners(&self, normalize_by: Option<Normalization>) -> [f64; 4] {
        Self::normalized(
            [self.xmin, self.ymin, self.xmax, self.ymax],
            normalize_by,
        )
    }

    /// `[xmin, ymin, width, height]`, the COCO `bbox` encoding.
    pub fn to_top_left_size(&self, normalize_by: Option<Normalization>) -> [f64; 4] {
        let (width, height) = self.dimensions();
        Self::normalized([self.xmin, self.ymin, width, height], normalize_by)
    }

    /// `[x_center, y_center, width, height]`, the YOLO encoding.
    pub fn to_center_size(&self, normalize_by: Option<Normalization>) -> [f64; 4] {
        let (width, height) = self.dimensions();
        Self::normalized(
            [
                self.xmin + width / 2.0,
                self.ymin + height / 2.0,
                width,
                height,
            ],
            normalize_by,
        )
    }

    fn normalized(values: [f64; 4], normalize_by: Option<Normalization>) -> [f64; 4] {
        match normalize_by {
            Some(normalization) => normalization.apply(values),
            None => values,
        }
    }
}
