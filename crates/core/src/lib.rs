//! `vymo-core` -- domain types for the VYMO emotion-analysis client.
//!
//! Pure data model and validation, no I/O: emotion predictions as
//! returned by the analysis API, video-analysis job status and
//! results, and artifact URL resolution. The HTTP layer lives in
//! `vymo-client`.

pub mod artifact;
pub mod emotion;
pub mod error;
pub mod job;
pub mod types;

pub use error::CoreError;
