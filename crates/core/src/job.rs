//! Video-analysis job status and result types.
//!
//! A job is a server-side asynchronous video-analysis task identified
//! by an opaque id. The client only ever observes it through the
//! status endpoint.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::EmotionScores;

/// Server-reported status of a video-analysis job.
///
/// The deployed backend reports in-flight jobs as `processing`, which
/// is accepted as an alias of [`JobStatus::Running`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    #[serde(alias = "processing")]
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether this status ends the polling loop.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// One timeline sample: average emotion scores across all faces in a
/// single frame. Frames without faces are not sampled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// 1-based frame index within the video.
    pub frame: u64,
    /// Seconds from the start of the video.
    pub timestamp: f64,
    pub emotions: EmotionScores,
}

/// Final payload of a completed video-analysis job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAnalysisResult {
    /// Emotion label -> share of face detections where it was dominant.
    pub main_emotions: EmotionScores,
    /// Relative path to the annotated video artifact, e.g.
    /// `/videos/annotated_<job>_<ts>.mp4`. Resolve against the API
    /// base URL with [`crate::artifact::resolve_artifact_url`].
    pub analyzed_video_url: String,
    pub emotion_timeline: Vec<TimelinePoint>,
}

impl VideoAnalysisResult {
    /// Validate well-formedness of every score map in the result.
    pub fn validate(&self) -> Result<(), CoreError> {
        crate::emotion::validate_scores(&self.main_emotions)?;
        for point in &self.emotion_timeline {
            crate::emotion::validate_scores(&point.emotions)?;
        }
        Ok(())
    }

    /// The overall dominant emotion, if any faces were detected.
    pub fn dominant_emotion(&self) -> Option<(&str, f64)> {
        crate::emotion::dominant_emotion(&self.main_emotions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_deserializes_lowercase() {
        let s: JobStatus = serde_json::from_str(r#""completed""#).unwrap();
        assert_eq!(s, JobStatus::Completed);
    }

    #[test]
    fn status_accepts_processing_alias() {
        let s: JobStatus = serde_json::from_str(r#""processing""#).unwrap();
        assert_eq!(s, JobStatus::Running);
    }

    #[test]
    fn status_rejects_unknown() {
        assert!(serde_json::from_str::<JobStatus>(r#""exploded""#).is_err());
    }

    #[test]
    fn terminal_statuses() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
    }

    #[test]
    fn result_deserializes_from_api_shape() {
        let json = r#"{
            "main_emotions": {"Happy": 0.8, "Neutral": 0.2},
            "analyzed_video_url": "/videos/annotated_abc_20250101_000000.mp4",
            "emotion_timeline": [
                {"frame": 1, "timestamp": 0.033, "emotions": {"Happy": 0.9}}
            ]
        }"#;
        let r: VideoAnalysisResult = serde_json::from_str(json).unwrap();
        assert!(r.validate().is_ok());
        assert_eq!(r.dominant_emotion(), Some(("Happy", 0.8)));
        assert_eq!(r.emotion_timeline.len(), 1);
    }
}
