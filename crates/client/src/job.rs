//! Asynchronous video-analysis job client.
//!
//! [`AnalysisJobClient`] manages the lifecycle of one analysis
//! request: submit the video, then poll the status endpoint on a
//! fixed interval until the job reaches a terminal state. Every
//! transition is published through a [`tokio::sync::watch`] channel;
//! dropping the returned [`JobHandle`] (or calling
//! [`JobHandle::cancel`]) stops the polling task and guarantees no
//! further state mutation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use vymo_core::job::{JobStatus, VideoAnalysisResult};

use crate::api::{AnalysisApi, AnalysisApiError, JobStatusResponse};
use crate::upload::UploadFile;

/// Default delay between status requests.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Default retry delays for transport failures during polling
/// (exponential backoff: 1s, 2s, 4s).
const DEFAULT_RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

/// Tunable parameters for the polling loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between consecutive status requests.
    pub interval: Duration,
    /// Backoff schedule for transport errors while polling. Each
    /// entry is one extra attempt; an empty schedule makes transport
    /// errors terminal on the first failure.
    pub retry_delays: Vec<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            retry_delays: DEFAULT_RETRY_DELAYS_SECS
                .iter()
                .map(|&s| Duration::from_secs(s))
                .collect(),
        }
    }
}

/// Observable state of one analysis request.
#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    /// No request has been issued yet.
    Idle,
    /// The video is being uploaded.
    Submitting,
    /// The server accepted the job; status is being polled.
    Polling {
        /// Server-assigned opaque job identifier.
        job_id: String,
    },
    /// Terminal: the job finished and produced a result.
    Completed(VideoAnalysisResult),
    /// Terminal: submission or analysis failed. Server-supplied
    /// errors are carried verbatim; local failures use the error's
    /// display form.
    Failed(String),
}

impl JobState {
    /// Whether the state machine has stopped.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed(_) | JobState::Failed(_))
    }
}

/// Submits videos and drives the poll loop for each submission.
pub struct AnalysisJobClient {
    api: Arc<AnalysisApi>,
    config: PollConfig,
}

impl AnalysisJobClient {
    pub fn new(api: Arc<AnalysisApi>) -> Self {
        Self::with_config(api, PollConfig::default())
    }

    pub fn with_config(api: Arc<AnalysisApi>, config: PollConfig) -> Self {
        Self { api, config }
    }

    /// Submit a video for analysis and start polling.
    ///
    /// Returns immediately with a [`JobHandle`]; the upload and the
    /// poll loop run on a spawned task. Submitting a new file is
    /// independent of earlier handles -- drop or cancel the old
    /// handle to stop its polling.
    pub fn submit(&self, file: UploadFile) -> JobHandle {
        let (state_tx, state_rx) = watch::channel(JobState::Idle);
        let cancel = CancellationToken::new();

        let api = Arc::clone(&self.api);
        let config = self.config.clone();
        let task_cancel = cancel.clone();

        let task = tokio::spawn(async move {
            run_job(&api, file, &config, &state_tx, &task_cancel).await;
        });

        JobHandle {
            state_rx,
            cancel,
            task,
        }
    }
}

/// Handle to one in-flight analysis job.
///
/// Dropping the handle cancels the job's polling task.
pub struct JobHandle {
    state_rx: watch::Receiver<JobState>,
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl JobHandle {
    /// Snapshot of the current state.
    pub fn state(&self) -> JobState {
        self.state_rx.borrow().clone()
    }

    /// A receiver observing every state transition.
    pub fn watch(&self) -> watch::Receiver<JobState> {
        self.state_rx.clone()
    }

    /// Stop the polling task. No state mutation occurs afterwards;
    /// the last published state stays in place.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait until the job reaches a terminal state and return it.
    ///
    /// If the task was cancelled before finishing, returns the last
    /// observed (non-terminal) state.
    pub async fn wait(mut self) -> JobState {
        loop {
            {
                let state = self.state_rx.borrow();
                if state.is_terminal() {
                    return state.clone();
                }
            }
            if self.state_rx.changed().await.is_err() {
                // Task ended (terminal state or cancellation).
                return self.state_rx.borrow().clone();
            }
        }
    }
}

impl Drop for JobHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

/// Drive one job from submission to terminal state.
async fn run_job(
    api: &AnalysisApi,
    file: UploadFile,
    config: &PollConfig,
    state_tx: &watch::Sender<JobState>,
    cancel: &CancellationToken,
) {
    if publish(state_tx, cancel, JobState::Submitting).is_err() {
        return;
    }

    let submitted = tokio::select! {
        _ = cancel.cancelled() => return,
        result = api.submit_video(file) => result,
    };

    let job_id = match submitted {
        Ok(created) => created.job_id,
        Err(e) => {
            tracing::warn!(error = %e, "Video submission failed");
            let _ = publish(state_tx, cancel, JobState::Failed(e.to_string()));
            return;
        }
    };

    tracing::info!(job_id = %job_id, "Video analysis job accepted");
    if publish(
        state_tx,
        cancel,
        JobState::Polling {
            job_id: job_id.clone(),
        },
    )
    .is_err()
    {
        return;
    }

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(job_id = %job_id, "Polling cancelled");
                return;
            }
            _ = tokio::time::sleep(config.interval) => {}
        }

        let response = match poll_with_retry(api, &job_id, config, cancel).await {
            Some(r) => r,
            None => return, // cancelled mid-request or mid-backoff
        };

        match response {
            Err(e) => {
                let _ = publish(state_tx, cancel, JobState::Failed(e.to_string()));
                return;
            }
            Ok(status) => match status.status {
                JobStatus::Pending | JobStatus::Running => {
                    tracing::debug!(job_id = %job_id, status = ?status.status, "Job still in progress");
                }
                JobStatus::Completed => {
                    let state = match status.result {
                        Some(result) => JobState::Completed(result),
                        // Contract violation on the server side.
                        None => JobState::Failed(
                            "Job completed without a result payload".to_string(),
                        ),
                    };
                    let _ = publish(state_tx, cancel, state);
                    return;
                }
                JobStatus::Failed => {
                    let message = status
                        .error
                        .unwrap_or_else(|| "Video analysis failed".to_string());
                    tracing::warn!(job_id = %job_id, error = %message, "Job failed");
                    let _ = publish(state_tx, cancel, JobState::Failed(message));
                    return;
                }
            },
        }
    }
}

/// Issue one status request, retrying transport failures per the
/// configured backoff schedule.
///
/// Returns `None` if cancelled, otherwise the final outcome after at
/// most `retry_delays.len() + 1` attempts. Server error responses
/// (non-2xx) are never retried.
async fn poll_with_retry(
    api: &AnalysisApi,
    job_id: &str,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> Option<Result<JobStatusResponse, AnalysisApiError>> {
    let mut attempt = 0usize;

    loop {
        let result = tokio::select! {
            _ = cancel.cancelled() => return None,
            r = api.job_status(job_id) => r,
        };

        match result {
            Ok(response) => return Some(Ok(response)),
            Err(e) if !e.is_transport() => return Some(Err(e)),
            Err(e) => {
                let Some(delay) = config.retry_delays.get(attempt) else {
                    return Some(Err(e));
                };
                attempt += 1;
                tracing::warn!(
                    job_id,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Status request failed, retrying",
                );
                tokio::select! {
                    _ = cancel.cancelled() => return None,
                    _ = tokio::time::sleep(*delay) => {}
                }
            }
        }
    }
}

/// Publish a state transition unless the job has been cancelled.
fn publish(
    state_tx: &watch::Sender<JobState>,
    cancel: &CancellationToken,
    state: JobState,
) -> Result<(), ()> {
    if cancel.is_cancelled() {
        return Err(());
    }
    let _ = state_tx.send(state);
    Ok(())
}
