//! Core types for clone jobs
//!
//! The error enum covers only the fatal taxonomy; per-asset failures are
//! accounting data on [`CloneJobResult`], never errors.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::downloader::AssetFailure;

/// Fatal error from a clone job
///
/// Only the initial page fetch (and the job's own filesystem setup) can
/// fail a job; every per-asset problem downstream is swallowed into
/// [`CloneJobResult::failures`].
#[derive(Debug, thiserror::Error)]
pub enum CloneError {
    #[error("Invalid URL '{url}': {error}")]
    InvalidUrl { url: String, error: String },

    #[error("Failed to fetch {url}: {error}")]
    Fetch { url: String, error: String },

    #[error("Page fetch failed with HTTP {status}: {url}")]
    PageStatus { url: String, status: u16 },

    #[error("Response is not an HTML document (content-type '{content_type}'): {url}")]
    NotHtml { url: String, content_type: String },

    #[error("Filesystem error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to rewrite HTML: {0}")]
    Rewrite(#[from] anyhow::Error),
}

/// Result of one complete clone job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneJobResult {
    /// Opaque unique identifier, also the job's directory name
    pub job_id: String,
    /// Absolute working directory, exclusive to this job
    pub work_dir: PathBuf,
    /// The URL the page was actually served from (after redirects); defines
    /// the same-origin boundary used for every asset decision
    pub source_url: String,
    /// The fully rewritten document, also written as `index.html`
    pub final_html: String,
    /// Prefix callers use to build a browsable URL for the output; empty
    /// when the environment cannot serve written files
    pub public_base_path: String,
    /// Per-asset download failures, for accounting only
    pub failures: Vec<AssetFailure>,
}
