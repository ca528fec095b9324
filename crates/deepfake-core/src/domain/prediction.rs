//! Prediction types returned by the detector.

use serde::{Deserialize, Serialize};

/// Number of output classes produced by the classifier head.
pub const NUM_CLASSES: usize = 2;

/// Class label predicted for an image.
///
/// The index order matches the class order the weights were trained with:
/// index 0 is `real`, index 1 is `fake`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Authentic image.
    Real,
    /// Manipulated or synthesized image.
    Fake,
}

impl Label {
    /// Maps a classifier output index to its label.
    ///
    /// Index 1 is `Fake`; every other index is `Real`.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        if index == 1 {
            Self::Fake
        } else {
            Self::Real
        }
    }

    /// Returns the classifier output index of this label.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Real => 0,
            Self::Fake => 1,
        }
    }

    /// Returns the wire name of this label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Fake => "fake",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a single image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted label.
    #[serde(rename = "prediction")]
    pub label: Label,
    /// Probability of the predicted label as a percentage, rounded to two decimals.
    pub confidence: f64,
    /// Per-class probabilities, indexed like [`Label::index`].
    #[serde(skip)]
    pub probabilities: [f32; NUM_CLASSES],
}

impl Prediction {
    /// Builds a prediction from per-class probabilities.
    ///
    /// The higher probability wins; a tie resolves to `Real` (index 0).
    #[must_use]
    pub fn from_probabilities(probabilities: [f32; NUM_CLASSES]) -> Self {
        let label = if probabilities[1] > probabilities[0] {
            Label::Fake
        } else {
            Label::Real
        };
        let percent = f64::from(probabilities[label.index()]) * 100.0;

        Self {
            label,
            confidence: round_to_hundredths(percent).clamp(0.0, 100.0),
            probabilities,
        }
    }
}

/// Rounds to two decimal places.
fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_label_mapping() {
        assert_eq!(Label::from_index(0), Label::Real);
        assert_eq!(Label::from_index(1), Label::Fake);
        assert_eq!(Label::Fake.index(), 1);
        assert_eq!(Label::Real.to_string(), "real");
    }

    #[test]
    fn test_fake_wins_when_more_probable() {
        let p = Prediction::from_probabilities([0.2, 0.8]);
        assert_eq!(p.label, Label::Fake);
        assert!((p.confidence - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_tie_resolves_to_real() {
        let p = Prediction::from_probabilities([0.5, 0.5]);
        assert_eq!(p.label, Label::Real);
        assert!((p.confidence - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_rounded_to_two_decimals() {
        let p = Prediction::from_probabilities([0.123_456, 0.876_544]);
        assert_eq!(p.label, Label::Fake);
        assert!((p.confidence - 87.65).abs() < 1e-9);
    }

    #[test]
    fn test_serializes_wire_shape() {
        let p = Prediction::from_probabilities([0.9, 0.1]);
        let json = serde_json::to_value(&p).expect("serialize prediction");
        assert_eq!(json["prediction"], "real");
        assert_eq!(json["confidence"], 90.0);
        assert!(json.get("probabilities").is_none());
        assert!(json.get("label").is_none());
    }
}
