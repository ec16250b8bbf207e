use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Default classes that other objects can rest on.
pub const DEFAULT_SURFACE_OBJECTS: [&str; 8] = [
    "table",
    "desk",
    "bed",
    "couch",
    "chair",
    "dining table",
    "counter",
    "shelf",
];

/// Default classes that a person can hold.
pub const DEFAULT_HOLDABLE_OBJECTS: [&str; 9] = [
    "cell phone",
    "bottle",
    "cup",
    "book",
    "remote",
    "fork",
    "knife",
    "spoon",
    "umbrella",
];

/// Default class that can hold objects.
pub const DEFAULT_HOLDER_CLASS: &str = "person";

/// The object categories that gate the `on` and `holding` predicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectCategories {
    /// Classes that other objects can be `on`.
    pub surface_objects: BTreeSet<String>,
    /// Classes that can be the object of `holding`.
    pub holdable_objects: BTreeSet<String>,
    /// The class that can be the subject of `holding`.
    pub holder_class: String,
}

impl Default for ObjectCategories {
    fn default() -> Self {
        Self {
            surface_objects: DEFAULT_SURFACE_OBJECTS.iter().map(|s| s.to_string()).collect(),
            holdable_objects: DEFAULT_HOLDABLE_OBJECTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            holder_class: DEFAULT_HOLDER_CLASS.to_string(),
        }
    }
}

impl ObjectCategories {
    /// Adds a class to the surface set.
    pub fn with_surface(mut self, class_name: impl Into<String>) -> Self {
        self.surface_objects.insert(class_name.into());
        self
    }

    /// Adds a class to the holdable set.
    pub fn with_holdable(mut self, class_name: impl Into<String>) -> Self {
        self.holdable_objects.insert(class_name.into());
        self
    }

    /// Whether objects can rest on `class_name`.
    pub fn is_surface(&self, class_name: &str) -> bool {
        self.surface_objects.contains(class_name)
    }

    /// Whether `class_name` can be held.
    pub fn is_holdable(&self, class_name: &str) -> bool {
        self.holdable_objects.contains(class_name)
    }

    /// Whether `class_name` can hold objects.
    pub fn is_holder(&self, class_name: &str) -> bool {
        self.holder_class == class_name
    }
}
