use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::{
    detection::{Detection, DetectionRecord},
    error::SceneError,
    relationship::Relationship,
};

/// The detections of a single frame as handed over by a detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// The identifier of the frame.
    #[serde(default)]
    pub frame_id: u64,
    /// The unvalidated detections of the frame.
    pub detections: Vec<DetectionRecord>,
}

/// Reads a JSON stream holding one frame record or a list of them.
///
/// Each frame is parsed on its own, so a malformed frame only yields an error at
/// its position and the other frames are still returned.
///
/// # Returns
///
/// One result per frame, or an error if the stream is not valid JSON.
pub fn read_frame_records<R: Read>(
    reader: R,
) -> Result<Vec<Result<FrameRecord, SceneError>>, SceneError> {
    let parse = |value| serde_json::from_value::<FrameRecord>(value).map_err(SceneError::from);

    let records = match serde_json::from_reader::<_, serde_json::Value>(reader)? {
        serde_json::Value::Array(values) => values.into_iter().map(parse).collect(),
        value => vec![parse(value)],
    };

    Ok(records)
}

/// The scene description of a processed frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameResult {
    frame_id: u64,
    num_objects: usize,
    objects: Vec<String>,
    detections: Vec<Detection>,
    relationships: Vec<Relationship>,
    prompt: String,
}

impl FrameResult {
    pub(crate) fn new(
        frame_id: u64,
        detections: Vec<Detection>,
        relationships: Vec<Relationship>,
        prompt: String,
    ) -> Self {
        let objects = detections
            .iter()
            .map(|d| d.class_name().to_string())
            .collect();

        Self {
            frame_id,
            num_objects: detections.len(),
            objects,
            detections,
            relationships,
            prompt,
        }
    }

    /// The identifier of the frame.
    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    /// The number of detected objects.
    pub fn num_objects(&self) -> usize {
        self.num_objects
    }

    /// The class names of the detected objects in detection order.
    pub fn objects(&self) -> &[String] {
        &self.objects
    }

    /// The detections of the frame in detection order.
    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    /// The deduplicated relationships of the frame.
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// The rendered scene prompt.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}
