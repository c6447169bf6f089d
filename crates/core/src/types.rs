//! Per-face analysis results returned by the `/analyze/image`
//! endpoints.
//!
//! The wire format for a bounding box is a 4-element integer array
//! `[x, y, w, h]` in pixel coordinates of the submitted image.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Emotion label mapped to a probability in `[0, 1]`.
pub type EmotionScores = BTreeMap<String, f64>;

/// Axis-aligned face bounding box in pixel coordinates.
///
/// Serialized as `[x, y, w, h]` to match the analysis API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl From<[i32; 4]> for BoundingBox {
    fn from([x, y, w, h]: [i32; 4]) -> Self {
        Self { x, y, w, h }
    }
}

impl From<BoundingBox> for [i32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x, b.y, b.w, b.h]
    }
}

impl BoundingBox {
    /// Validate well-formedness: width and height must be non-negative.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.w < 0 || self.h < 0 {
            return Err(CoreError::Validation(format!(
                "Bounding box dimensions must be non-negative, got {}x{}",
                self.w, self.h
            )));
        }
        Ok(())
    }
}

/// One detected face: bounding box plus per-emotion probabilities.
///
/// Immutable once received; owned by whoever issued the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionPrediction {
    /// Face location as `[x, y, w, h]`.
    #[serde(rename = "box")]
    pub bounding_box: BoundingBox,
    /// Emotion label -> probability.
    pub emotions: EmotionScores,
}

impl EmotionPrediction {
    /// Validate well-formedness of the box and every probability.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.bounding_box.validate()?;
        crate::emotion::validate_scores(&self.emotions)
    }
}
