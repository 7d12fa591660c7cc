//! Shared utilities for URL handling and configuration constants.

pub mod constants;
pub mod url_utils;

pub use constants::{
    DEFAULT_ASSET_TIMEOUT_SECS, DEFAULT_DOWNLOAD_CONCURRENCY, DEFAULT_PAGE_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};
pub use url_utils::{is_fetchable_url, is_same_origin, local_asset_path, resolve_url};
