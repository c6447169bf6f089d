//! Argument parsing and command dispatch.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use vymo_client::{AnalysisApi, AnalysisJobClient, JobState, PollConfig, UploadFile};

use crate::render;

/// Default analysis API host (the backend's dev binding).
const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Parser, Debug)]
#[command(name = "vymo")]
#[command(about = "Detect facial emotions in images and videos via the VYMO analysis API")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Analysis API base URL. Falls back to $VYMO_API_URL, then the
    /// local dev default.
    #[arg(long)]
    pub api_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze the faces in a single image
    Image { path: PathBuf },

    /// Analyze two images and compare their emotions
    Compare { path1: PathBuf, path2: PathBuf },

    /// Submit a video for analysis and poll until it finishes
    Video {
        path: PathBuf,

        /// Seconds between status requests
        #[arg(long, default_value_t = 3)]
        poll_interval_secs: u64,

        /// Download the annotated video to this file when done
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub async fn dispatch(args: Args) -> Result<()> {
    let base_url = resolve_api_url(args.api_url);
    vymo_core::artifact::validate_api_url(&base_url)?;
    let api = Arc::new(AnalysisApi::new(base_url));

    match args.cmd {
        Command::Image { path } => analyze_image(&api, &path).await,
        Command::Compare { path1, path2 } => compare_images(&api, &path1, &path2).await,
        Command::Video {
            path,
            poll_interval_secs,
            output,
        } => analyze_video(&api, &path, poll_interval_secs, output.as_deref()).await,
    }
}

fn resolve_api_url(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var("VYMO_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

async fn read_upload(path: &Path) -> Result<UploadFile> {
    UploadFile::from_path(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

async fn analyze_image(api: &AnalysisApi, path: &Path) -> Result<()> {
    let file = read_upload(path).await?;
    tracing::info!(file = %path.display(), "Analyzing image");

    let response = api.analyze_image(file).await?;
    render::print_faces(&response.results);
    Ok(())
}

async fn compare_images(api: &AnalysisApi, path1: &Path, path2: &Path) -> Result<()> {
    let file1 = read_upload(path1).await?;
    let file2 = read_upload(path2).await?;
    tracing::info!(
        file1 = %path1.display(),
        file2 = %path2.display(),
        "Comparing images",
    );

    let response = api.compare_images(file1, file2).await?;
    render::print_comparison(&response.results_image1, &response.results_image2);
    Ok(())
}

async fn analyze_video(
    api: &Arc<AnalysisApi>,
    path: &Path,
    poll_interval_secs: u64,
    output: Option<&Path>,
) -> Result<()> {
    let file = read_upload(path).await?;
    let config = PollConfig {
        interval: Duration::from_secs(poll_interval_secs),
        ..PollConfig::default()
    };

    let client = AnalysisJobClient::with_config(Arc::clone(api), config);
    let handle = client.submit(file);
    let mut state_rx = handle.watch();

    // Log each transition, then stop at the first terminal state.
    let final_state = loop {
        let state = state_rx.borrow_and_update().clone();
        if state.is_terminal() {
            break state;
        }
        match &state {
            JobState::Submitting => tracing::info!(file = %path.display(), "Uploading video"),
            JobState::Polling { job_id } => {
                tracing::info!(job_id = %job_id, "Analysis running, waiting for completion")
            }
            _ => {}
        }
        if state_rx.changed().await.is_err() {
            break handle.state();
        }
    };

    match final_state {
        JobState::Completed(result) => {
            render::print_video_result(&result, api.base_url());
            if let Some(out) = output {
                let bytes = api.download_artifact(&result.analyzed_video_url).await?;
                tokio::fs::write(out, bytes)
                    .await
                    .with_context(|| format!("Failed to write {}", out.display()))?;
                tracing::info!(file = %out.display(), "Annotated video saved");
            }
            Ok(())
        }
        JobState::Failed(message) => bail!("Video analysis failed: {message}"),
        other => bail!("Analysis ended without a result (last state: {other:?})"),
    }
}
