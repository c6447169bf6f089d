//! Emotion label constants and score helpers.
//!
//! The labels match the backend model's training order. The client
//! treats labels as open-ended strings everywhere else, so a model
//! retrained with a different label set does not break parsing.

use crate::error::CoreError;
use crate::types::EmotionScores;

pub const EMOTION_ANGRY: &str = "Angry";
pub const EMOTION_DISGUST: &str = "Disgust";
pub const EMOTION_FEAR: &str = "Fear";
pub const EMOTION_HAPPY: &str = "Happy";
pub const EMOTION_NEUTRAL: &str = "Neutral";
pub const EMOTION_SAD: &str = "Sad";
pub const EMOTION_SURPRISE: &str = "Surprise";

/// All labels the deployed model emits, in training order.
pub const EMOTION_LABELS: &[&str] = &[
    EMOTION_ANGRY,
    EMOTION_DISGUST,
    EMOTION_FEAR,
    EMOTION_HAPPY,
    EMOTION_NEUTRAL,
    EMOTION_SAD,
    EMOTION_SURPRISE,
];

/// The label with the highest score, with its score.
///
/// Returns `None` for an empty map. Ties resolve to the
/// lexicographically first label (map iteration order).
pub fn dominant_emotion(scores: &EmotionScores) -> Option<(&str, f64)> {
    scores
        .iter()
        .fold(None, |best: Option<(&str, f64)>, (label, &score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((label.as_str(), score)),
        })
}

/// Validate that every score is a probability in `[0, 1]`.
pub fn validate_scores(scores: &EmotionScores) -> Result<(), CoreError> {
    for (label, &score) in scores {
        if !(0.0..=1.0).contains(&score) {
            return Err(CoreError::Validation(format!(
                "Score for '{label}' must be within [0, 1], got {score}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(&str, f64)]) -> EmotionScores {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn dominant_emotion_picks_highest() {
        let s = scores(&[("Happy", 0.7), ("Neutral", 0.2), ("Sad", 0.1)]);
        assert_eq!(dominant_emotion(&s), Some(("Happy", 0.7)));
    }

    #[test]
    fn dominant_emotion_empty_is_none() {
        assert_eq!(dominant_emotion(&EmotionScores::new()), None);
    }

    #[test]
    fn dominant_emotion_tie_is_first_label() {
        let s = scores(&[("Sad", 0.5), ("Happy", 0.5)]);
        assert_eq!(dominant_emotion(&s), Some(("Happy", 0.5)));
    }

    #[test]
    fn validate_scores_accepts_bounds() {
        let s = scores(&[("Happy", 0.0), ("Sad", 1.0)]);
        assert!(validate_scores(&s).is_ok());
    }

    #[test]
    fn validate_scores_rejects_negative() {
        let s = scores(&[("Happy", -0.1)]);
        assert!(validate_scores(&s).is_err());
    }

    #[test]
    fn validate_scores_rejects_nan() {
        let s = scores(&[("Happy", f64::NAN)]);
        assert!(validate_scores(&s).is_err());
    }

    #[test]
    fn label_set_is_complete() {
        assert_eq!(EMOTION_LABELS.len(), 7);
    }
}
