//! Job configuration for the clone pipeline
//!
//! The pipeline itself is deployment-agnostic; everything
//! environment-specific lives here. Callers inject the output-root and
//! public-base-path strategy by constructing a `CloneConfig`, so no module
//! downstream ever branches on a platform flag.

use std::path::PathBuf;
use std::time::Duration;

use crate::utils::constants::{
    DEFAULT_ASSET_TIMEOUT_SECS, DEFAULT_DOWNLOAD_CONCURRENCY, DEFAULT_PAGE_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};

/// Environment variable naming a persistent, servable output root
pub const OUTPUT_DIR_ENV: &str = "SITEMIRROR_OUTPUT_DIR";

/// Environment variable overriding the public base path for servable roots
pub const PUBLIC_BASE_ENV: &str = "SITEMIRROR_PUBLIC_BASE";

/// Public base path used when an output root is servable and no override is set
const DEFAULT_PUBLIC_BASE: &str = "/clones";

/// Configuration for a clone job
///
/// `public_base_path` is empty when the execution environment cannot serve
/// arbitrary written files; callers must then fall back to the original
/// absolute URLs instead of a local base (see
/// [`crate::html_rewriter::inject_base_href`]).
#[derive(Debug, Clone)]
pub struct CloneConfig {
    /// Directory under which per-job working directories are created
    pub output_root: PathBuf,
    /// Prefix for constructing a browsable URL to job output; empty when
    /// the environment cannot serve written files
    pub public_base_path: String,
    /// Maximum simultaneous in-flight asset downloads
    pub download_concurrency: usize,
    /// Per-asset download timeout
    pub asset_timeout: Duration,
    /// Timeout for the initial page fetch
    pub page_timeout: Duration,
    /// User agent sent on every request
    pub user_agent: String,
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            output_root: std::env::temp_dir().join("sitemirror"),
            public_base_path: String::new(),
            download_concurrency: DEFAULT_DOWNLOAD_CONCURRENCY,
            asset_timeout: Duration::from_secs(DEFAULT_ASSET_TIMEOUT_SECS),
            page_timeout: Duration::from_secs(DEFAULT_PAGE_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CloneConfig {
    /// Build a config from the process environment.
    ///
    /// When `SITEMIRROR_OUTPUT_DIR` names a persistent root, jobs land there
    /// and `public_base_path` is `SITEMIRROR_PUBLIC_BASE` (default
    /// `/clones`). Without it the config falls back to an ephemeral temp
    /// root with an empty public base path, signalling callers that written
    /// files cannot be served back.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(OUTPUT_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => Self {
                output_root: PathBuf::from(dir),
                public_base_path: std::env::var(PUBLIC_BASE_ENV)
                    .unwrap_or_else(|_| DEFAULT_PUBLIC_BASE.to_string()),
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    /// Override the output root
    #[must_use]
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    /// Override the public base path
    #[must_use]
    pub fn with_public_base_path(mut self, base: impl Into<String>) -> Self {
        self.public_base_path = base.into();
        self
    }

    /// Override the download concurrency bound
    #[must_use]
    pub fn with_download_concurrency(mut self, limit: usize) -> Self {
        self.download_concurrency = limit.max(1);
        self
    }

    /// Override the per-asset timeout
    #[must_use]
    pub fn with_asset_timeout(mut self, timeout: Duration) -> Self {
        self.asset_timeout = timeout;
        self
    }
}
