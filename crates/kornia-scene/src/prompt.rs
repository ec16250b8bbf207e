use std::str::FromStr;

use crate::{detection::Detection, frame::FrameResult, relationship::Relationship};

const NO_RELATIONSHIPS_LINE: &str = "- No clear spatial relationships detected";

const ANSWER_INSTRUCTION: &str = "Based on the scene analysis above and the visual information, please answer the question accurately.";

/// A question to ask the vision-language model about the scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneQuery {
    /// Ask for a description of the scene.
    Describe,
    /// Ask to count the objects and check the layout.
    Count,
    /// A free-text question.
    Custom(String),
}

impl SceneQuery {
    /// The question text.
    pub fn text(&self) -> &str {
        match self {
            SceneQuery::Describe => "Describe the scene.",
            SceneQuery::Count => "Count objects and check spatial layout.",
            SceneQuery::Custom(question) => question,
        }
    }
}

impl FromStr for SceneQuery {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "describe" => Ok(SceneQuery::Describe),
            "count" => Ok(SceneQuery::Count),
            _ => Err(format!(
                "unknown preset '{s}', expected 'describe' or 'count'"
            )),
        }
    }
}

/// Renders the scene prompt of a processed frame.
///
/// # Arguments
///
/// * `frame` - The processed frame.
/// * `question` - An optional question appended after the scene analysis. Empty
///   questions are ignored.
pub fn format_prompt(frame: &FrameResult, question: Option<&str>) -> String {
    render_prompt(frame.detections(), frame.relationships(), question)
}

/// Builds the final request for the vision-language model from a scene prompt.
pub fn compose_vlm_prompt(scene_prompt: &str, query: &SceneQuery) -> String {
    format!("{scene_prompt}\nQuestion: {}\nAnswer:", query.text())
}

pub(crate) fn render_prompt(
    detections: &[Detection],
    relationships: &[Relationship],
    question: Option<&str>,
) -> String {
    let objects = detections
        .iter()
        .map(|d| format!("{} (confidence: {:.2})", d.class_name(), d.confidence()))
        .collect::<Vec<_>>()
        .join(", ");

    let relations = if relationships.is_empty() {
        NO_RELATIONSHIPS_LINE.to_string()
    } else {
        relationships
            .iter()
            .map(|r| format!("- {r}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut prompt = format!(
        "**Scene Analysis:**\n\n**Detected Objects:** {objects}\n\n**Spatial Relationships:**\n{relations}\n"
    );

    if let Some(question) = question.filter(|q| !q.trim().is_empty()) {
        prompt.push_str(&format!(
            "\n**Question:** {question}\n\n{ANSWER_INSTRUCTION}"
        ));
    }

    prompt
}
