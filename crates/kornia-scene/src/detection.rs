use serde::{Deserialize, Serialize};

use crate::{bbox::BoundingBox, error::SceneError};

/// The 80 COCO class names in detector label order.
const COCO_CLASS_NAMES: [&str; 80] = [
    "person",
    "bicycle",
    "car",
    "motorcycle",
    "airplane",
    "bus",
    "train",
    "truck",
    "boat",
    "traffic light",
    "fire hydrant",
    "stop sign",
    "parking meter",
    "bench",
    "bird",
    "cat",
    "dog",
    "horse",
    "sheep",
    "cow",
    "elephant",
    "bear",
    "zebra",
    "giraffe",
    "backpack",
    "umbrella",
    "handbag",
    "tie",
    "suitcase",
    "frisbee",
    "skis",
    "snowboard",
    "sports ball",
    "kite",
    "baseball bat",
    "baseball glove",
    "skateboard",
    "surfboard",
    "tennis racket",
    "bottle",
    "wine glass",
    "cup",
    "fork",
    "knife",
    "spoon",
    "bowl",
    "banana",
    "apple",
    "sandwich",
    "orange",
    "broccoli",
    "carrot",
    "hot dog",
    "pizza",
    "donut",
    "cake",
    "chair",
    "couch",
    "potted plant",
    "bed",
    "dining table",
    "toilet",
    "tv",
    "laptop",
    "mouse",
    "remote",
    "keyboard",
    "cell phone",
    "microwave",
    "oven",
    "toaster",
    "sink",
    "refrigerator",
    "book",
    "clock",
    "vase",
    "scissors",
    "teddy bear",
    "hair drier",
    "toothbrush",
];

/// A detection record as handed over by an object detector.
///
/// This is the unvalidated wire shape; convert it into a [`Detection`] with
/// `Detection::try_from` before processing. Missing fields are kept as `None`
/// so they are reported as `SceneError::InvalidDetection` on conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// The class label of the detected object.
    pub class_name: Option<String>,
    /// The confidence score of the detection.
    pub confidence: Option<f64>,
    /// The bounding box as `[x_min, y_min, x_max, y_max]`.
    pub bbox: Option<[f64; 4]>,
}

impl DetectionRecord {
    /// Creates a record with every field set.
    pub fn new(class_name: impl Into<String>, confidence: f64, bbox: [f64; 4]) -> Self {
        Self {
            class_name: Some(class_name.into()),
            confidence: Some(confidence),
            bbox: Some(bbox),
        }
    }
}

fn missing_field(name: &str) -> SceneError {
    SceneError::InvalidDetection(format!("missing field '{name}'"))
}

/// Represents a validated detected object in an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DetectionRecord")]
pub struct Detection {
    class_name: String,
    confidence: f64,
    bbox: BoundingBox,
}

impl Detection {
    /// Creates a new detection.
    ///
    /// # Arguments
    ///
    /// * `class_name` - The semantic label of the object, must not be empty.
    /// * `confidence` - The confidence score, must lie in `[0, 1]`.
    /// * `bbox` - The bounding box of the object.
    ///
    /// # Returns
    ///
    /// The detection, or `SceneError::InvalidDetection` if a field is malformed.
    pub fn new(
        class_name: impl Into<String>,
        confidence: f64,
        bbox: BoundingBox,
    ) -> Result<Self, SceneError> {
        let class_name = class_name.into();

        if class_name.trim().is_empty() {
            return Err(SceneError::InvalidDetection(
                "class name must not be empty".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&confidence) {
            return Err(SceneError::InvalidDetection(format!(
                "confidence {confidence} of '{class_name}' is outside [0, 1]"
            )));
        }

        Ok(Self {
            class_name,
            confidence,
            bbox,
        })
    }

    /// Creates a detection from a detector output given as class id, score and
    /// top-left corner plus size.
    ///
    /// # Arguments
    ///
    /// * `names` - The lookup table of the detector class names.
    /// * `label` - The class id of the detected object.
    /// * `score` - The confidence score.
    /// * `xywh` - The box as `[x, y, w, h]`.
    pub fn from_xywh_label(
        names: &ClassNames,
        label: u32,
        score: f64,
        xywh: [f64; 4],
    ) -> Result<Self, SceneError> {
        let class_name = names.get(label).ok_or_else(|| {
            SceneError::InvalidDetection(format!("unknown class id {label}"))
        })?;
        let bbox = BoundingBox::from_xywh(xywh[0], xywh[1], xywh[2], xywh[3])?;
        Self::new(class_name, score, bbox)
    }

    /// The class label of the detected object.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The confidence score of the detection.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// The bounding box of the detection.
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }
}

impl TryFrom<DetectionRecord> for Detection {
    type Error = SceneError;

    fn try_from(record: DetectionRecord) -> Result<Self, Self::Error> {
        let class_name = record.class_name.ok_or_else(|| missing_field("class_name"))?;
        let confidence = record.confidence.ok_or_else(|| missing_field("confidence"))?;
        let bbox = record.bbox.ok_or_else(|| missing_field("bbox"))?;
        Self::new(class_name, confidence, BoundingBox::try_from(bbox)?)
    }
}

impl From<Detection> for DetectionRecord {
    fn from(detection: Detection) -> Self {
        Self::new(detection.class_name, detection.confidence, detection.bbox.into())
    }
}

/// Lookup table from detector class ids to class names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassNames(Vec<String>);

impl ClassNames {
    /// Creates a new lookup table where the class id is the index in `names`.
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    /// The COCO class names used by the common YOLO and RT-DETR checkpoints.
    pub fn coco() -> Self {
        Self(COCO_CLASS_NAMES.iter().map(|s| s.to_string()).collect())
    }

    /// Returns the class name for the given id.
    pub fn get(&self, label: u32) -> Option<&str> {
        self.0.get(label as usize).map(String::as_str)
    }

    /// The number of known classes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
