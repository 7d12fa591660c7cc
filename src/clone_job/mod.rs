//! Clone job orchestration
//!
//! `run_clone_job` is the single externally-visible entry point: fetch the
//! page, collect same-origin assets, download them with bounded
//! concurrency, rewrite downloaded stylesheets in place, rewrite the HTML
//! attributes, and persist `index.html` into a fresh per-job directory.
//!
//! The steps are strictly sequential; only the individual downloads within
//! a batch overlap. Once the initial fetch succeeds the job always runs to
//! completion — missing assets degrade the clone, they do not abort it.

pub mod types;

pub use types::{CloneError, CloneJobResult};

use std::collections::HashSet;

use chrono::Utc;
use rand::Rng;
use reqwest::Client;
use url::Url;

use crate::asset_collector::{collect_assets, AssetKind};
use crate::config::CloneConfig;
use crate::css_rewriter::rewrite_stylesheet_file;
use crate::downloader::download_assets;
use crate::html_rewriter::rewrite_html;
use crate::page_fetcher::fetch_page;

/// Allocate a job identifier: UTC timestamp plus a random hex suffix.
///
/// The suffix keeps two jobs started in the same second (even for the same
/// URL) in separate working directories.
fn allocate_job_id() -> String {
    let timestamp = Utc::now().format("%Y%m%d%H%M%S");
    let suffix: u32 = rand::rng().random();
    format!("{timestamp}-{suffix:08x}")
}

/// Run one complete clone job for `url`.
///
/// Fatal errors (invalid URL, failed page fetch, non-HTML response, job
/// directory setup) propagate; they all occur before the working directory
/// holds anything, so a failed job never leaves output that looks
/// complete. Per-asset failures are returned on the result.
pub async fn run_clone_job(config: &CloneConfig, url: &str) -> Result<CloneJobResult, CloneError> {
    let requested_url = Url::parse(url).map_err(|e| CloneError::InvalidUrl {
        url: url.to_string(),
        error: e.to_string(),
    })?;

    let client = Client::new();

    // Step 1: the fatal fetch, before any directory exists.
    let page = fetch_page(&client, &requested_url, config).await?;

    // Step 2: job identity and a fresh, never-reused working directory.
    let job_id = allocate_job_id();
    let work_dir = config.output_root.join(&job_id);
    tokio::fs::create_dir_all(&work_dir)
        .await
        .map_err(|e| CloneError::Io {
            path: work_dir.display().to_string(),
            source: e,
        })?;

    log::info!("Clone job {job_id} started for {}", page.final_url);

    // Steps 3-4: parse and collect the deduplicated worklist.
    let mut visited = HashSet::new();
    let assets = collect_assets(&page.html, &page.final_url, &mut visited);

    // Step 5: bounded-concurrency download of the worklist.
    let mut failures = download_assets(&client, &assets, &work_dir, config).await;

    // Step 6: rewrite downloaded stylesheets in place, pulling in whatever
    // they reference. One level deep, matching the collection pass.
    for asset in &assets {
        if asset.kind == AssetKind::Stylesheet || asset.local_path.ends_with(".css") {
            let nested =
                rewrite_stylesheet_file(&client, asset, &work_dir, &mut visited, config).await;
            failures.extend(nested);
        }
    }

    // Steps 7-8: rewrite attributes, serialize, persist index.html.
    let final_html = rewrite_html(&page.html, &page.final_url)?;

    let index_path = work_dir.join("index.html");
    tokio::fs::write(&index_path, &final_html)
        .await
        .map_err(|e| CloneError::Io {
            path: index_path.display().to_string(),
            source: e,
        })?;

    log::info!(
        "Clone job {job_id} finished: {} assets queued, {} failed",
        assets.len(),
        failures.len()
    );

    Ok(CloneJobResult {
        job_id,
        work_dir,
        source_url: page.final_url.to_string(),
        final_html,
        public_base_path: config.public_base_path.clone(),
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_ids_are_unique() {
        let a = allocate_job_id();
        let b = allocate_job_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_job_id_shape() {
        let id = allocate_job_id();
        let (timestamp, suffix) = id.split_once('-').expect("job id must contain a dash");
        assert_eq!(timestamp.len(), 14);
        assert!(timestamp.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
