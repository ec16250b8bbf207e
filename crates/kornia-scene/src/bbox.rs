use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// An axis-aligned bounding box in image pixel coordinates.
///
/// The box is stored as `[x_min, y_min, x_max, y_max]` and always satisfies
/// `x_min <= x_max` and `y_min <= y_max` with finite coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from its corners.
    ///
    /// # Arguments
    ///
    /// * `x_min` - The left edge of the box.
    /// * `y_min` - The top edge of the box.
    /// * `x_max` - The right edge of the box.
    /// * `y_max` - The bottom edge of the box.
    ///
    /// # Returns
    ///
    /// The bounding box, or `SceneError::InvalidDetection` if a coordinate is not
    /// finite, the corners are swapped or the size of the box overflows.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Self, SceneError> {
        if ![x_min, y_min, x_max, y_max].iter().all(|v| v.is_finite()) {
            return Err(SceneError::InvalidDetection(format!(
                "non-finite bounding box [{x_min}, {y_min}, {x_max}, {y_max}]"
            )));
        }

        if x_min > x_max {
            return Err(SceneError::InvalidDetection(format!(
                "x_min ({x_min}) is greater than x_max ({x_max})"
            )));
        }

        if y_min > y_max {
            return Err(SceneError::InvalidDetection(format!(
                "y_min ({y_min}) is greater than y_max ({y_max})"
            )));
        }

        let bbox = Self {
            x_min,
            y_min,
            x_max,
            y_max,
        };

        // huge finite corners can still overflow the derived geometry
        let [cx, cy] = bbox.center();
        if ![bbox.area(), cx, cy].iter().all(|v| v.is_finite()) {
            return Err(SceneError::InvalidDetection(format!(
                "bounding box [{x_min}, {y_min}, {x_max}, {y_max}] overflows its extent"
            )));
        }

        Ok(bbox)
    }

    /// Creates a new bounding box from its top-left corner and size.
    pub fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Result<Self, SceneError> {
        Self::new(x, y, x + w, y + h)
    }

    /// The left edge of the box.
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// The top edge of the box.
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    /// The right edge of the box.
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// The bottom edge of the box.
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// The width of the box.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// The height of the box.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// The area of the box in square pixels.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// The center of the box as `[x, y]`.
    pub fn center(&self) -> [f64; 2] {
        [
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        ]
    }

    /// Whether `x` lies within the closed horizontal span `[x_min, x_max]`.
    pub fn spans_x(&self, x: f64) -> bool {
        self.x_min <= x && x <= self.x_max
    }

    /// Euclidean distance between the centers of two boxes.
    pub fn center_distance(&self, other: &BoundingBox) -> f64 {
        let [x1, y1] = self.center();
        let [x2, y2] = other.center();
        ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt()
    }
}

impl TryFrom<[f64; 4]> for BoundingBox {
    type Error = SceneError;

    fn try_from(xyxy: [f64; 4]) -> Result<Self, Self::Error> {
        Self::new(xyxy[0], xyxy[1], xyxy[2], xyxy[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max]
    }
}
