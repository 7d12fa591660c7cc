//! Initial page fetch
//!
//! The one fetch in the pipeline that is allowed to fail the job: a network
//! error, non-2xx status, or non-HTML content type here propagates to the
//! caller before any directory is created.

use reqwest::Client;
use url::Url;

use crate::clone_job::CloneError;
use crate::config::CloneConfig;

/// The fetched page plus the URL the server actually served it from
///
/// Redirects are followed, so `final_url` (not the requested URL) defines
/// the same-origin boundary and the resolution base for every asset
/// decision downstream.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub final_url: Url,
    pub html: String,
}

/// Check whether a Content-Type header indicates an HTML document.
fn is_html_content_type(content_type: &str) -> bool {
    content_type.contains("text/html") || content_type.contains("application/xhtml")
}

/// Fetch the page HTML, following redirects.
pub async fn fetch_page(
    client: &Client,
    url: &Url,
    config: &CloneConfig,
) -> Result<FetchedPage, CloneError> {
    let response = client
        .get(url.as_str())
        .timeout(config.page_timeout)
        .header("User-Agent", &config.user_agent)
        .header("Accept", "text/html,*/*")
        .send()
        .await
        .map_err(|e| CloneError::Fetch {
            url: url.to_string(),
            error: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CloneError::PageStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !is_html_content_type(&content_type) {
        return Err(CloneError::NotHtml {
            url: url.to_string(),
            content_type,
        });
    }

    let final_url = response.url().clone();

    let html = response.text().await.map_err(|e| CloneError::Fetch {
        url: url.to_string(),
        error: e.to_string(),
    })?;

    log::debug!("Fetched {} ({} bytes of HTML)", final_url, html.len());

    Ok(FetchedPage { final_url, html })
}
