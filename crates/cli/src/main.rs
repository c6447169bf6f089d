//! `vymo` -- command-line client for the VYMO emotion-analysis API.
//!
//! One subcommand per analysis flow: single image, two-image
//! comparison, and asynchronous video analysis (submit, poll,
//! render, optionally download the annotated artifact).
//!
//! # Environment variables
//!
//! | Variable       | Required | Default                 | Description             |
//! |----------------|----------|-------------------------|-------------------------|
//! | `VYMO_API_URL` | no       | `http://localhost:8000` | Analysis API base URL   |
//! | `RUST_LOG`     | no       | `vymo_cli=info,...`     | Tracing filter override |

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod render;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vymo_cli=info,vymo_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = cli::Args::parse();
    if let Err(err) = cli::dispatch(args).await {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
    Ok(())
}
