use std::fmt;

use serde::{Deserialize, Serialize};

/// The label of a spatial relationship between two objects.
///
/// The declaration order defines the order relationships are listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// The subject rests on top of the object.
    On,
    /// The subject holds the object.
    Holding,
    /// The subject is left of the object.
    LeftOf,
    /// The subject is right of the object.
    RightOf,
    /// The subject is close to the object.
    Near,
}

impl Predicate {
    /// The snake case label, e.g. `left_of`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Predicate::On => "on",
            Predicate::Holding => "holding",
            Predicate::LeftOf => "left_of",
            Predicate::RightOf => "right_of",
            Predicate::Near => "near",
        }
    }

    /// The label written as words, e.g. `left of`.
    pub fn as_words(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed relationship `(subject, predicate, object)` between two classes.
///
/// Relationships compare by class names and predicate only, so two object
/// instances of the same classes produce equal relationships.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Relationship {
    /// The class name of the subject.
    pub subject: String,
    /// The relationship label.
    pub predicate: Predicate,
    /// The class name of the object.
    pub object: String,
}

impl Relationship {
    /// Creates a new relationship.
    pub fn new(subject: impl Into<String>, predicate: Predicate, object: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is {} {}",
            self.subject,
            self.predicate.as_words(),
            self.object
        )
    }
}
