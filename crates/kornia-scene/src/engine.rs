use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    categories::ObjectCategories,
    detection::Detection,
    error::SceneError,
    frame::{FrameRecord, FrameResult},
    prompt::render_prompt,
    relationship::{Predicate, Relationship},
};

/// Fraction of the holder box height, measured from its top, where held objects can be.
const HOLDING_REGION_RATIO: f64 = 0.7;

/// Configuration for the [`RelationshipEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipEngineConfig {
    /// Reserved tunable for the `on` predicate.
    ///
    /// It is validated and stored but no classifier reads it; the vertical
    /// tolerance of `on` is [`RelationshipEngineConfig::on_vertical_tolerance`].
    pub on_threshold: f64,
    /// Maximum center to center distance in pixels for `near`. The comparison is strict.
    pub near_threshold: f64,
    /// Maximum vertical center offset in pixels for `left_of` / `right_of`.
    pub horizontal_alignment_threshold: f64,
    /// Maximum distance in pixels between the subject bottom edge and the surface top edge
    /// for `on`. The comparison is strict.
    pub on_vertical_tolerance: f64,
    /// The surface, holdable and holder classes.
    #[serde(flatten)]
    pub categories: ObjectCategories,
}

impl Default for RelationshipEngineConfig {
    fn default() -> Self {
        Self {
            on_threshold: 0.3,
            near_threshold: 150.0,
            horizontal_alignment_threshold: 50.0,
            on_vertical_tolerance: 50.0,
            categories: ObjectCategories::default(),
        }
    }
}

impl RelationshipEngineConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// See [`RelationshipEngineConfig::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&data)
    }

    /// Parses a configuration from a JSON string.
    ///
    /// Fields missing from the document keep their default value. Unknown keys,
    /// e.g. a misspelled threshold name, are ignored with a warning.
    pub fn from_json_str(data: &str) -> Result<Self, SceneError> {
        let value = serde_json::from_str::<serde_json::Value>(data)?;
        for key in unknown_config_keys(&value) {
            log::warn!("Ignoring unknown configuration key '{key}'");
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Sets the `near` distance threshold.
    pub fn with_near_threshold(mut self, near_threshold: f64) -> Self {
        self.near_threshold = near_threshold;
        self
    }

    /// Sets the horizontal alignment threshold.
    pub fn with_horizontal_alignment_threshold(mut self, threshold: f64) -> Self {
        self.horizontal_alignment_threshold = threshold;
        self
    }

    /// Sets the vertical tolerance of the `on` predicate.
    pub fn with_on_vertical_tolerance(mut self, tolerance: f64) -> Self {
        self.on_vertical_tolerance = tolerance;
        self
    }

    /// Sets the object categories.
    pub fn with_categories(mut self, categories: ObjectCategories) -> Self {
        self.categories = categories;
        self
    }

    /// Checks that every threshold is finite and non-negative and the holder class is set.
    pub fn validate(&self) -> Result<(), SceneError> {
        let thresholds = [
            ("on_threshold", self.on_threshold),
            ("near_threshold", self.near_threshold),
            (
                "horizontal_alignment_threshold",
                self.horizontal_alignment_threshold,
            ),
            ("on_vertical_tolerance", self.on_vertical_tolerance),
        ];

        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(SceneError::Configuration(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }

        if self.categories.holder_class.trim().is_empty() {
            return Err(SceneError::Configuration(
                "holder_class must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

const CONFIG_KEYS: [&str; 7] = [
    "on_threshold",
    "near_threshold",
    "horizontal_alignment_threshold",
    "on_vertical_tolerance",
    "surface_objects",
    "holdable_objects",
    "holder_class",
];

fn unknown_config_keys(value: &serde_json::Value) -> Vec<&str> {
    value
        .as_object()
        .map(|map| {
            map.keys()
                .map(String::as_str)
                .filter(|key| !CONFIG_KEYS.contains(key))
                .collect()
        })
        .unwrap_or_default()
}

/// Infers spatial relationships between the detections of a frame.
///
/// The engine only holds its immutable configuration, so a shared reference can
/// be used from several threads at once.
#[derive(Debug, Clone)]
pub struct RelationshipEngine {
    config: RelationshipEngineConfig,
}

impl RelationshipEngine {
    /// Creates a new engine.
    ///
    /// # Arguments
    ///
    /// * `config` - The engine configuration.
    ///
    /// # Returns
    ///
    /// The engine, or `SceneError::Configuration` if the configuration is invalid.
    pub fn new(config: RelationshipEngineConfig) -> Result<Self, SceneError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The engine configuration.
    pub fn config(&self) -> &RelationshipEngineConfig {
        &self.config
    }

    /// Whether `obj1` rests on `obj2`.
    ///
    /// True when `obj2` is a surface class, the bottom edge of `obj1` lies within
    /// the vertical tolerance of the top edge of `obj2`, and the horizontal center
    /// of `obj1` lies inside the horizontal span of `obj2`.
    pub fn classify_on(&self, obj1: &Detection, obj2: &Detection) -> bool {
        if !self.config.categories.is_surface(obj2.class_name()) {
            return false;
        }

        let vertical_aligned = (obj1.bbox().y_max() - obj2.bbox().y_min()).abs()
            < self.config.on_vertical_tolerance;

        let [obj1_center_x, _] = obj1.bbox().center();
        let horizontal_overlap = obj2.bbox().spans_x(obj1_center_x);

        vertical_aligned && horizontal_overlap
    }

    /// Whether `person` holds `obj`.
    ///
    /// True when `person` is the holder class, `obj` is holdable and the center of
    /// `obj` lies inside the horizontal span and the upper 70% of the `person` box.
    pub fn classify_holding(&self, person: &Detection, obj: &Detection) -> bool {
        let categories = &self.config.categories;
        if !categories.is_holder(person.class_name()) || !categories.is_holdable(obj.class_name())
        {
            return false;
        }

        let person_box = person.bbox();
        let [obj_center_x, obj_center_y] = obj.bbox().center();

        let in_horizontal = person_box.spans_x(obj_center_x);

        let upper_region = person_box.y_min() + person_box.height() * HOLDING_REGION_RATIO;
        let in_upper = obj_center_y <= upper_region;

        in_horizontal && in_upper
    }

    /// Returns `left_of` or `right_of` for two horizontally aligned objects.
    ///
    /// Returns `None` when the vertical distance between the centers exceeds the
    /// alignment threshold. Equal center x coordinates resolve to `right_of`.
    pub fn classify_horizontal(&self, obj1: &Detection, obj2: &Detection) -> Option<Predicate> {
        let [x1, y1] = obj1.bbox().center();
        let [x2, y2] = obj2.bbox().center();

        if (y1 - y2).abs() > self.config.horizontal_alignment_threshold {
            return None;
        }

        if x1 < x2 {
            Some(Predicate::LeftOf)
        } else {
            Some(Predicate::RightOf)
        }
    }

    /// Whether the centers of the two objects are closer than the near threshold.
    pub fn classify_near(&self, obj1: &Detection, obj2: &Detection) -> bool {
        obj1.bbox().center_distance(obj2.bbox()) < self.config.near_threshold
    }

    /// Builds the deduplicated set of relationships between the detections.
    ///
    /// Every ordered pair of distinct detections is classified, largest box
    /// first. `on` and then `holding` take precedence over the other predicates
    /// of the same pair; `left_of` / `right_of` and `near` can both hold.
    ///
    /// # Arguments
    ///
    /// * `detections` - The detections of a single frame.
    ///
    /// # Returns
    ///
    /// The relationships, sorted by subject, predicate and object.
    pub fn build_relationships(&self, detections: &[Detection]) -> Vec<Relationship> {
        // stable sort so equal areas keep their input order
        let mut sorted = detections.iter().collect::<Vec<_>>();
        sorted.sort_by(|a, b| b.bbox().area().total_cmp(&a.bbox().area()));

        let mut relationships = BTreeSet::new();

        for (i, obj1) in sorted.iter().enumerate() {
            for (j, obj2) in sorted.iter().enumerate() {
                if i == j {
                    continue;
                }

                let subject = obj1.class_name();
                let object = obj2.class_name();

                if self.classify_on(obj1, obj2) {
                    log::trace!("{subject}[{i}] on {object}[{j}]");
                    relationships.insert(Relationship::new(subject, Predicate::On, object));
                    continue;
                }

                if self.classify_holding(obj1, obj2) {
                    log::trace!("{subject}[{i}] holding {object}[{j}]");
                    relationships.insert(Relationship::new(subject, Predicate::Holding, object));
                    continue;
                }

                if let Some(predicate) = self.classify_horizontal(obj1, obj2) {
                    relationships.insert(Relationship::new(subject, predicate, object));
                }

                if self.classify_near(obj1, obj2) {
                    relationships.insert(Relationship::new(subject, Predicate::Near, object));
                }
            }
        }

        log::debug!(
            "Built {} relationships from {} detections",
            relationships.len(),
            detections.len()
        );

        relationships.into_iter().collect()
    }

    /// Processes the detections of a frame into a [`FrameResult`].
    ///
    /// # Arguments
    ///
    /// * `frame_id` - The identifier of the frame.
    /// * `detections` - The detections of the frame.
    /// * `question` - An optional question appended to the prompt.
    pub fn process_frame(
        &self,
        frame_id: u64,
        detections: Vec<Detection>,
        question: Option<&str>,
    ) -> FrameResult {
        let relationships = self.build_relationships(&detections);
        let prompt = render_prompt(&detections, &relationships, question);
        FrameResult::new(frame_id, detections, relationships, prompt)
    }

    /// Validates a frame record as handed over by a detector and processes it.
    ///
    /// The whole frame is rejected with `SceneError::InvalidDetection` on the
    /// first malformed detection.
    pub fn process_record(
        &self,
        record: FrameRecord,
        question: Option<&str>,
    ) -> Result<FrameResult, SceneError> {
        let detections = record
            .detections
            .into_iter()
            .map(Detection::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.process_frame(record.frame_id, detections, question))
    }
}
