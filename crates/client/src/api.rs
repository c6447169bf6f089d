//! REST client for the emotion-analysis HTTP endpoints.
//!
//! Wraps the analysis API (image analysis, image comparison, video
//! submission, job status, artifact download) using [`reqwest`]. The
//! API contract is consumed, not defined, here; response shapes
//! mirror what the backend actually sends.

use std::time::Duration;

use serde::Deserialize;
use vymo_core::job::{JobStatus, VideoAnalysisResult};
use vymo_core::types::EmotionPrediction;

use crate::upload::UploadFile;

/// HTTP request timeout for a single API call. Uploads of large
/// videos can be slow, so this is deliberately generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP client for one analysis API host.
pub struct AnalysisApi {
    client: reqwest::Client,
    base_url: String,
}

/// Response of `POST /analyze/image`.
#[derive(Debug, Deserialize)]
pub struct ImageAnalysisResponse {
    /// One entry per detected face; empty when no faces were found.
    pub results: Vec<EmotionPrediction>,
}

/// Response of `POST /analyze/image-comparison`.
#[derive(Debug, Deserialize)]
pub struct ImageComparisonResponse {
    pub results_image1: Vec<EmotionPrediction>,
    pub results_image2: Vec<EmotionPrediction>,
}

/// Response of `POST /analyze/video` after the job has been queued.
#[derive(Debug, Deserialize)]
pub struct JobCreated {
    /// Server-assigned opaque job identifier.
    pub job_id: String,
    /// Human-readable acknowledgement, e.g. "Video analysis started.".
    #[serde(default)]
    pub message: String,
}

/// Response of `GET /analyze/video/status/{job_id}`.
#[derive(Debug, Deserialize)]
pub struct JobStatusResponse {
    pub status: JobStatus,
    /// Present only once the job is `completed`.
    #[serde(default)]
    pub result: Option<VideoAnalysisResult>,
    /// Present only when the job is `failed`.
    #[serde(default)]
    pub error: Option<String>,
}

/// Errors from the analysis API layer.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("Analysis API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl AnalysisApiError {
    /// Whether this error came from the transport rather than the
    /// server. Transport errors are candidates for retry; server
    /// responses are not.
    pub fn is_transport(&self) -> bool {
        matches!(self, AnalysisApiError::Request(_))
    }
}

impl AnalysisApi {
    /// Create a new client for an analysis API host.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://localhost:8000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self::with_client(client, base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Base HTTP URL of the analysis host (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Analyze the emotions in a single image.
    ///
    /// Sends a `POST /analyze/image` multipart request with the image
    /// in the `file` field.
    pub async fn analyze_image(
        &self,
        file: UploadFile,
    ) -> Result<ImageAnalysisResponse, AnalysisApiError> {
        let form = reqwest::multipart::Form::new().part("file", to_part(file)?);

        let response = self
            .client
            .post(format!("{}/analyze/image", self.base_url))
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Analyze and compare the emotions in two images.
    ///
    /// Sends a `POST /analyze/image-comparison` multipart request with
    /// the images in the `file1` and `file2` fields.
    pub async fn compare_images(
        &self,
        file1: UploadFile,
        file2: UploadFile,
    ) -> Result<ImageComparisonResponse, AnalysisApiError> {
        let form = reqwest::multipart::Form::new()
            .part("file1", to_part(file1)?)
            .part("file2", to_part(file2)?);

        let response = self
            .client
            .post(format!("{}/analyze/image-comparison", self.base_url))
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Submit a video for background analysis.
    ///
    /// Sends a `POST /analyze/video` multipart request. The server
    /// queues the job and responds immediately with its id; progress
    /// is observed via [`job_status`](Self::job_status).
    pub async fn submit_video(&self, file: UploadFile) -> Result<JobCreated, AnalysisApiError> {
        let form = reqwest::multipart::Form::new().part("file", to_part(file)?);

        let response = self
            .client
            .post(format!("{}/analyze/video", self.base_url))
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the current status of a video-analysis job.
    ///
    /// Sends a `GET /analyze/video/status/{job_id}` request. An
    /// unknown job id yields an [`AnalysisApiError::Api`] with
    /// status 404.
    pub async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, AnalysisApiError> {
        let response = self
            .client
            .get(format!("{}/analyze/video/status/{}", self.base_url, job_id))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Download an artifact (e.g. an annotated video) served by the
    /// API host at a path returned in a job result.
    pub async fn download_artifact(&self, path: &str) -> Result<Vec<u8>, AnalysisApiError> {
        let url = vymo_core::artifact::resolve_artifact_url(&self.base_url, path);
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`AnalysisApiError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, AnalysisApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AnalysisApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AnalysisApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Build a multipart part from an upload, carrying file name and
/// MIME type.
fn to_part(file: UploadFile) -> Result<reqwest::multipart::Part, AnalysisApiError> {
    let part = reqwest::multipart::Part::bytes(file.bytes)
        .file_name(file.file_name)
        .mime_str(&file.content_type)?;
    Ok(part)
}
