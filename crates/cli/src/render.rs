//! Plain-text rendering of analysis results.

use std::cmp::Ordering;

use vymo_core::artifact::resolve_artifact_url;
use vymo_core::emotion::dominant_emotion;
use vymo_core::job::VideoAnalysisResult;
use vymo_core::types::{EmotionPrediction, EmotionScores};

/// Print per-face predictions for one image.
pub fn print_faces(results: &[EmotionPrediction]) {
    if results.is_empty() {
        println!("No faces detected.");
        return;
    }
    for (index, face) in results.iter().enumerate() {
        let b = face.bounding_box;
        match dominant_emotion(&face.emotions) {
            Some((label, score)) => println!(
                "Face {}: {} ({:.1}%) at [x={} y={} w={} h={}]",
                index + 1,
                label,
                score * 100.0,
                b.x,
                b.y,
                b.w,
                b.h
            ),
            None => println!(
                "Face {}: no emotion scores at [x={} y={} w={} h={}]",
                index + 1,
                b.x,
                b.y,
                b.w,
                b.h
            ),
        }
        for (label, score) in by_score_desc(&face.emotions) {
            println!("    {label:<10} {:>6.2}%", score * 100.0);
        }
    }
}

/// Print both result sets of a two-image comparison.
pub fn print_comparison(results1: &[EmotionPrediction], results2: &[EmotionPrediction]) {
    println!("=== Image 1 ===");
    print_faces(results1);
    println!();
    println!("=== Image 2 ===");
    print_faces(results2);
}

/// Print the summary of a completed video analysis.
pub fn print_video_result(result: &VideoAnalysisResult, base_url: &str) {
    match result.dominant_emotion() {
        Some((label, score)) => {
            println!("Dominant emotion: {} ({:.2}%)", label, score * 100.0)
        }
        None => println!("No faces detected in the video."),
    }

    println!("Emotion shares across detected faces:");
    for (label, score) in by_score_desc(&result.main_emotions) {
        println!("    {label:<10} {:>6.2}%", score * 100.0);
    }

    if let Some(last) = result.emotion_timeline.last() {
        println!(
            "Timeline: {} sampled frames over {:.1}s",
            result.emotion_timeline.len(),
            last.timestamp
        );
    }

    println!(
        "Annotated video: {}",
        resolve_artifact_url(base_url, &result.analyzed_video_url)
    );
}

/// Scores sorted highest first, label order breaking ties.
fn by_score_desc(scores: &EmotionScores) -> Vec<(&str, f64)> {
    let mut entries: Vec<(&str, f64)> = scores.iter().map(|(k, &v)| (k.as_str(), v)).collect();
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    entries
}
