//! In-process mock of the analysis API for integration tests.
//!
//! Serves the same routes and shapes as the real backend. Status
//! responses are scripted per test: request N gets entry N, and the
//! last entry repeats once the script is exhausted, so an endless
//! `pending` job is a one-entry script. An empty script simulates an
//! unknown job id (404).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// One scripted status response: HTTP status code plus JSON body.
pub type ScriptEntry = (u16, Value);

#[derive(Clone)]
struct MockState {
    status_script: Arc<Vec<ScriptEntry>>,
    status_hits: Arc<AtomicUsize>,
}

/// A running mock analysis server bound to an ephemeral port.
pub struct MockServer {
    pub base_url: String,
    status_hits: Arc<AtomicUsize>,
    task: tokio::task::JoinHandle<()>,
}

impl MockServer {
    /// Bind to `127.0.0.1:0` and serve until dropped.
    pub async fn start(status_script: Vec<ScriptEntry>) -> Self {
        let status_hits = Arc::new(AtomicUsize::new(0));
        let state = MockState {
            status_script: Arc::new(status_script),
            status_hits: Arc::clone(&status_hits),
        };

        let app = Router::new()
            .route("/analyze/image", post(analyze_image))
            .route("/analyze/image-comparison", post(compare_images))
            .route("/analyze/video", post(submit_video))
            .route("/analyze/video/status/{job_id}", get(job_status))
            .route("/videos/{name}", get(serve_artifact))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("mock server addr");

        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server");
        });

        Self {
            base_url: format!("http://{addr}"),
            status_hits,
            task,
        }
    }

    /// Number of status requests received so far.
    pub fn status_hits(&self) -> usize {
        self.status_hits.load(Ordering::SeqCst)
    }

    /// Stop accepting connections; subsequent requests fail at the
    /// transport level.
    pub fn shutdown(&self) {
        self.task.abort();
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// JSON for one detected face, matching the backend's shape.
pub fn face_json() -> Value {
    json!({
        "box": [100, 150, 50, 50],
        "emotions": {"Happy": 0.93, "Neutral": 0.05, "Sad": 0.02}
    })
}

/// JSON for a completed video-analysis result.
pub fn video_result_json() -> Value {
    json!({
        "main_emotions": {"Happy": 0.8, "Neutral": 0.2},
        "analyzed_video_url": "/videos/annotated_job-123.mp4",
        "emotion_timeline": [
            {"frame": 1, "timestamp": 0.04, "emotions": {"Happy": 0.9, "Neutral": 0.1}}
        ]
    })
}

// ---- handlers ----

/// Collect multipart field names, draining the payloads.
async fn field_names(mut multipart: Multipart) -> Vec<String> {
    let mut names = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        names.push(field.name().unwrap_or_default().to_string());
        let _ = field.bytes().await;
    }
    names
}

async fn analyze_image(multipart: Multipart) -> impl IntoResponse {
    if !field_names(multipart).await.contains(&"file".to_string()) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": "Field required: file"})),
        );
    }
    (StatusCode::OK, Json(json!({"results": [face_json()]})))
}

async fn compare_images(multipart: Multipart) -> impl IntoResponse {
    let names = field_names(multipart).await;
    if !names.contains(&"file1".to_string()) || !names.contains(&"file2".to_string()) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": "Fields required: file1, file2"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "results_image1": [face_json()],
            "results_image2": []
        })),
    )
}

async fn submit_video(multipart: Multipart) -> impl IntoResponse {
    if !field_names(multipart).await.contains(&"file".to_string()) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": "Field required: file"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"job_id": "job-123", "message": "Video analysis started."})),
    )
}

async fn job_status(
    State(state): State<MockState>,
    Path(_job_id): Path<String>,
) -> impl IntoResponse {
    let index = state.status_hits.fetch_add(1, Ordering::SeqCst);
    match state.status_script.len().checked_sub(1) {
        Some(last) => {
            let (code, body) = &state.status_script[index.min(last)];
            (
                StatusCode::from_u16(*code).expect("scripted status code"),
                Json(body.clone()),
            )
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Job not found"})),
        ),
    }
}

async fn serve_artifact(Path(name): Path<String>) -> impl IntoResponse {
    (StatusCode::OK, format!("fake-video-bytes:{name}").into_bytes())
}
