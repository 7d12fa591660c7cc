//! Bounded-concurrency asset downloading
//!
//! Downloads a job's asset worklist into its working directory with a fixed
//! cap on simultaneous in-flight requests. Individual failures are recorded
//! and swallowed; a broken image on the source page must never abort the
//! clone.

use std::path::Path;
use std::sync::Arc;

use futures::future::join_all;
use reqwest::Client;
use tokio::sync::Semaphore;

use crate::asset_collector::AssetRef;
use crate::config::CloneConfig;

/// Error type for a single asset download
#[derive(Debug, Clone, thiserror::Error)]
pub enum DownloadError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("HTTP error {status}: {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Write failed for {path}: {error}")]
    WriteFailed { path: String, error: String },
}

/// Record of a failed asset download
///
/// Rides on the job result for accounting; failures never propagate as
/// errors. A failed asset is simply absent from the output tree while its
/// references are still rewritten to the (absent) local path.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AssetFailure {
    pub url: String,
    pub local_path: String,
    pub error: String,
}

/// Download one asset to its local path under `work_dir`.
async fn download_one(
    client: Client,
    asset: AssetRef,
    work_dir: &Path,
    config: &CloneConfig,
) -> Result<(), DownloadError> {
    let target = work_dir.join(&asset.local_path);

    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DownloadError::WriteFailed {
                path: target.display().to_string(),
                error: e.to_string(),
            })?;
    }

    let response = client
        .get(asset.url.as_str())
        .timeout(config.asset_timeout)
        .header("User-Agent", &config.user_agent)
        .header("Accept", "*/*")
        .send()
        .await
        .map_err(|e| DownloadError::RequestFailed(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::HttpStatus {
            url: asset.url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| DownloadError::RequestFailed(e.to_string()))?;

    tokio::fs::write(&target, &bytes)
        .await
        .map_err(|e| DownloadError::WriteFailed {
            path: target.display().to_string(),
            error: e.to_string(),
        })?;

    log::debug!(
        "Downloaded {} -> {} ({} bytes)",
        asset.url,
        asset.local_path,
        bytes.len()
    );

    Ok(())
}

/// Download every asset in the worklist, bounding in-flight requests.
///
/// A shared semaphore caps simultaneous downloads at
/// `config.download_concurrency`; the remaining items wait for a permit, so
/// at steady state exactly the configured number of requests is
/// outstanding. The batch always runs to completion and returns the
/// failures for accounting.
pub async fn download_assets(
    client: &Client,
    assets: &[AssetRef],
    work_dir: &Path,
    config: &CloneConfig,
) -> Vec<AssetFailure> {
    let semaphore = Arc::new(Semaphore::new(config.download_concurrency));

    let futures = assets.iter().map(|asset| {
        let client = client.clone();
        let asset = asset.clone();
        let semaphore = Arc::clone(&semaphore);

        async move {
            // Acquire only fails if the semaphore is closed, which never
            // happens here since it lives for the duration of this call.
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return Some(AssetFailure {
                    url: asset.url.to_string(),
                    local_path: asset.local_path.clone(),
                    error: "Semaphore closed unexpectedly".to_string(),
                });
            };

            match download_one(client, asset.clone(), work_dir, config).await {
                Ok(()) => None,
                Err(e) => {
                    log::warn!("Failed to download {}: {e}", asset.url);
                    Some(AssetFailure {
                        url: asset.url.to_string(),
                        local_path: asset.local_path,
                        error: e.to_string(),
                    })
                }
            }
        }
    });

    join_all(futures).await.into_iter().flatten().collect()
}
