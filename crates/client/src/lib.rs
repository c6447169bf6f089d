//! `vymo-client` -- HTTP client for the VYMO emotion-analysis API.
//!
//! [`AnalysisApi`] wraps the remote endpoints (image analysis, image
//! comparison, video submission, job status, artifact download).
//! [`AnalysisJobClient`] layers the asynchronous video-analysis flow
//! on top: submit, poll the status endpoint on a fixed interval, and
//! publish every state transition until the job reaches a terminal
//! state or the caller cancels.

pub mod api;
pub mod job;
pub mod upload;

pub use api::{AnalysisApi, AnalysisApiError};
pub use job::{AnalysisJobClient, JobHandle, JobState, PollConfig};
pub use upload::UploadFile;
