//! Classification result types

use serde::{Deserialize, Serialize};

/// Number of output classes (safe, scam)
pub const NUM_LABELS: usize = 2;

/// Predicted class for a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    Safe,
    Scam,
}

impl Label {
    /// Map a class index (argmax over the two logits) to a label.
    /// Class 0 is safe, class 1 is scam.
    pub fn from_class_index(index: usize) -> Self {
        if index == 0 {
            Label::Safe
        } else {
            Label::Scam
        }
    }

    /// Fixed explanation string for this class
    pub fn explanation(&self) -> &'static str {
        match self {
            Label::Safe => "Message looks safe.",
            Label::Scam => "Potential scam.",
        }
    }
}

/// Result of classifying one message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub label: Label,
    /// Softmax probability of the predicted label
    pub score: f32,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_class_index() {
        assert_eq!(Label::from_class_index(0), Label::Safe);
        assert_eq!(Label::from_class_index(1), Label::Scam);
    }

    #[test]
    fn test_label_serialization() {
        assert_eq!(serde_json::to_string(&Label::Safe).unwrap(), "\"SAFE\"");
        assert_eq!(serde_json::to_string(&Label::Scam).unwrap(), "\"SCAM\"");
    }

    #[test]
    fn test_explanations_are_class_keyed() {
        assert_eq!(Label::Safe.explanation(), "Message looks safe.");
        assert_eq!(Label::Scam.explanation(), "Potential scam.");
    }

    #[test]
    fn test_classification_roundtrip() {
        let c = Classification {
            label: Label::Scam,
            score: 0.97,
            explanation: Label::Scam.explanation().to_string(),
        };
        let json = serde_json::to_string(&c).unwrap();
        let back: Classification = serde_json::from_str(&json).unwrap();
        assert_eq!(back.label, Label::Scam);
        assert!(back.score > 0.9);
    }
}
