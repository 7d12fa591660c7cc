//! `url(...)` rewriting inside downloaded stylesheets
//!
//! Scans stylesheet text for `url(...)` references, resolves each against
//! the stylesheet's own URL (CSS-relative paths resolve against the CSS
//! file's location, not the page's), queues same-origin targets for
//! download, and substitutes the local path into the text.
//!
//! The scan is regex-based rather than a full CSS tokenizer; comments
//! containing literal `url(` text or parentheses inside strings are out of
//! scope for a best-effort offline-portability tool.

use std::collections::HashSet;
use std::path::Path;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use reqwest::Client;
use url::Url;

use crate::asset_collector::{AssetKind, AssetRef};
use crate::config::CloneConfig;
use crate::downloader::{download_assets, AssetFailure};
use crate::utils::url_utils::{is_fetchable_url, is_same_origin, local_asset_path, resolve_url};

lazy_static! {
    // Matches url(target), url('target'), url("target"); quotes and
    // surrounding whitespace are stripped in code since the regex crate
    // has no backreferences.
    static ref CSS_URL_RE: Regex =
        Regex::new(r"url\(\s*([^)]+?)\s*\)").expect("BUG: hardcoded CSS url() regex is invalid");
}

/// Rewrite every same-origin `url(...)` reference to its local path.
///
/// Returns the rewritten stylesheet text plus the newly discovered assets,
/// deduplicated against the job's `visited` set. The substitution is purely
/// syntactic: a reference is rewritten whenever it is same-origin, whether
/// or not its download later succeeds. Local paths contain no characters
/// needing quotes, so the substituted form is unquoted.
#[must_use]
pub fn rewrite_css(
    css: &str,
    css_url: &Url,
    visited: &mut HashSet<String>,
) -> (String, Vec<AssetRef>) {
    let mut discovered = Vec::new();

    let rewritten = CSS_URL_RE.replace_all(css, |caps: &Captures| {
        let raw = caps[1].trim_matches(|c| c == '"' || c == '\'');

        if !is_fetchable_url(raw) {
            return caps[0].to_string();
        }
        let Some(resolved) = resolve_url(css_url, raw) else {
            return caps[0].to_string();
        };
        if !is_same_origin(css_url, &resolved) {
            return caps[0].to_string();
        }

        let local_path = local_asset_path(&resolved);
        if visited.insert(resolved.as_str().to_string()) {
            discovered.push(AssetRef {
                url: resolved,
                local_path: local_path.clone(),
                kind: AssetKind::Other,
            });
        }

        format!("url({local_path})")
    });

    (rewritten.into_owned(), discovered)
}

/// Rewrite one downloaded stylesheet in place, downloading what it references.
///
/// Reads the file from the job directory, rewrites its references,
/// downloads the nested same-origin batch through the bounded downloader,
/// and overwrites the file. A stylesheet that never arrived or cannot be
/// read is logged and skipped; a write failure leaves the file as
/// originally downloaded. Both are per-file non-fatal.
pub async fn rewrite_stylesheet_file(
    client: &Client,
    asset: &AssetRef,
    work_dir: &Path,
    visited: &mut HashSet<String>,
    config: &CloneConfig,
) -> Vec<AssetFailure> {
    let path = work_dir.join(&asset.local_path);

    let css = match tokio::fs::read_to_string(&path).await {
        Ok(css) => css,
        Err(e) => {
            log::debug!("Skipping CSS rewrite for {}: {e}", path.display());
            return Vec::new();
        }
    };

    let (rewritten, discovered) = rewrite_css(&css, &asset.url, visited);

    let failures = download_assets(client, &discovered, work_dir, config).await;

    if let Err(e) = tokio::fs::write(&path, rewritten).await {
        log::warn!(
            "Failed to write rewritten stylesheet {}: {e}",
            path.display()
        );
    }

    failures
}
