#![deny(missing_docs)]
//! # Kornia Scene
//!
//! Spatial relationship inference from object detections.
//!
//! Given the detections of a frame, the [`RelationshipEngine`] classifies every
//! ordered pair of objects into the predicates `on`, `holding`, `left_of`,
//! `right_of` and `near`, and renders a scene summary used as a prompt for a
//! vision-language model.
//!
//! ```
//! use kornia_scene::{BoundingBox, Detection, RelationshipEngine, RelationshipEngineConfig};
//!
//! let engine = RelationshipEngine::new(RelationshipEngineConfig::default())?;
//! let detections = vec![
//!     Detection::new("cup", 0.9, BoundingBox::new(100.0, 100.0, 150.0, 140.0)?)?,
//!     Detection::new("table", 0.8, BoundingBox::new(50.0, 130.0, 300.0, 400.0)?)?,
//! ];
//! let frame = engine.process_frame(0, detections, None);
//! assert!(frame.prompt().contains("- cup is on table"));
//! # Ok::<(), kornia_scene::SceneError>(())
//! ```

/// Bounding box geometry.
pub mod bbox;

/// Object categories gating the `on` and `holding` predicates.
pub mod categories;

/// Detection types and detector output conversion.
pub mod detection;

/// The relationship engine and its configuration.
pub mod engine;

/// Error types for the scene module.
pub mod error;

/// Frame records and results.
pub mod frame;

/// Scene prompt rendering.
pub mod prompt;

/// Relationship predicates and triples.
pub mod relationship;

pub use bbox::BoundingBox;
pub use categories::ObjectCategories;
pub use detection::{ClassNames, Detection, DetectionRecord};
pub use engine::{RelationshipEngine, RelationshipEngineConfig};
pub use error::SceneError;
pub use frame::{read_frame_records, FrameRecord, FrameResult};
pub use prompt::{compose_vlm_prompt, format_prompt, SceneQuery};
pub use relationship::{Predicate, Relationship};
