//! Shared configuration constants for sitemirror
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Default number of simultaneous in-flight asset downloads: 10
///
/// Bounds how many network requests a job keeps outstanding at once.
/// Workers drain a shared worklist, so a slow download never starves the
/// fast ones.
pub const DEFAULT_DOWNLOAD_CONCURRENCY: usize = 10;

/// Default per-asset download timeout: 15 seconds
///
/// A single slow asset must not hold a worker slot indefinitely. A
/// timed-out asset is simply absent from the output tree; it is not
/// retried.
pub const DEFAULT_ASSET_TIMEOUT_SECS: u64 = 15;

/// Default timeout for the initial page fetch: 30 seconds
///
/// More generous than the per-asset timeout since the page fetch is fatal
/// when it fails and may involve redirect chains.
pub const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 30;

/// User agent sent on the page fetch and every asset download
///
/// Descriptive rather than stealthy: this tool mirrors a single page the
/// operator asked for, it does not crawl.
pub const DEFAULT_USER_AGENT: &str = "sitemirror/0.3 (+https://github.com/fourmarketing/sitemirror)";

/// Filename stem synthesized for an asset whose URL path is the origin root
pub const ROOT_ASSET_STEM: &str = "file";

/// Extension used when a root asset's URL carries no `format` query parameter
pub const ROOT_ASSET_DEFAULT_EXT: &str = "bin";
