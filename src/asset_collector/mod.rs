//! Asset discovery over a fetched HTML document
//!
//! The collection pass walks a fixed set of element/attribute pairs and
//! builds the deduplicated worklist of same-origin assets for a job. It is
//! strictly read-only; attribute rewriting happens later in
//! [`crate::html_rewriter`] against the live DOM values.

use std::collections::HashSet;

use lazy_static::lazy_static;
use scraper::{Html, Selector};
use url::Url;

use crate::utils::url_utils::{is_fetchable_url, is_same_origin, local_asset_path, resolve_url};

lazy_static! {
    // These selectors are hardcoded and syntactically valid CSS selectors.
    // If they fail to parse, it indicates a compile-time bug in the selector strings.
    static ref STYLESHEET_SELECTOR: Selector = Selector::parse("link[rel=\"stylesheet\"][href]")
        .expect("BUG: hardcoded stylesheet selector is invalid");
    static ref SCRIPT_SELECTOR: Selector =
        Selector::parse("script[src]").expect("BUG: hardcoded script selector is invalid");
    static ref IMG_SRC_SELECTOR: Selector =
        Selector::parse("img[src]").expect("BUG: hardcoded img[src] selector is invalid");
    static ref IMG_SRCSET_SELECTOR: Selector =
        Selector::parse("img[srcset]").expect("BUG: hardcoded img[srcset] selector is invalid");
    static ref MEDIA_SELECTOR: Selector =
        Selector::parse("source[src], video[src], audio[src]")
            .expect("BUG: hardcoded media selector is invalid");
    static ref META_IMAGE_SELECTOR: Selector =
        Selector::parse("meta[property=\"og:image\"], meta[name=\"twitter:image\"]")
            .expect("BUG: hardcoded meta selector is invalid");
}

/// Category of a discovered asset
///
/// Only used to decide whether a downloaded file additionally gets the CSS
/// rewrite pass; it does not change download behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Stylesheet,
    Script,
    Image,
    Media,
    Other,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::Stylesheet => write!(f, "stylesheet"),
            AssetKind::Script => write!(f, "script"),
            AssetKind::Image => write!(f, "image"),
            AssetKind::Media => write!(f, "media"),
            AssetKind::Other => write!(f, "other"),
        }
    }
}

/// A single entry in a job's download worklist
///
/// Transient: created during collection, consumed during download and again
/// (read-only) while rewriting. Never outlives one job invocation.
#[derive(Debug, Clone)]
pub struct AssetRef {
    /// Fully resolved absolute URL of the asset
    pub url: Url,
    /// Deterministic relative path the asset is mirrored to
    pub local_path: String,
    pub kind: AssetKind,
}

/// Split a `srcset` attribute into (URL, descriptor) candidates.
///
/// Descriptors (`1x`, `480w`, ...) are carried through untouched so the
/// rewrite pass can preserve them byte-for-byte.
#[must_use]
pub fn parse_srcset(value: &str) -> Vec<(String, Option<String>)> {
    value
        .split(',')
        .filter_map(|candidate| {
            let mut parts = candidate.split_whitespace();
            let url = parts.next()?.to_string();
            let descriptor = parts.collect::<Vec<_>>().join(" ");
            let descriptor = (!descriptor.is_empty()).then_some(descriptor);
            Some((url, descriptor))
        })
        .collect()
}

/// Queue a raw attribute value if it resolves to an unvisited same-origin URL.
fn push_candidate(
    raw: &str,
    kind: AssetKind,
    page_url: &Url,
    assets: &mut Vec<AssetRef>,
    visited: &mut HashSet<String>,
) {
    if !is_fetchable_url(raw) {
        return;
    }
    let Some(resolved) = resolve_url(page_url, raw) else {
        log::debug!("Skipping unresolvable asset reference: {raw}");
        return;
    };
    if !is_same_origin(page_url, &resolved) {
        return;
    }
    if !visited.insert(resolved.as_str().to_string()) {
        return;
    }
    let local_path = local_asset_path(&resolved);
    assets.push(AssetRef {
        url: resolved,
        local_path,
        kind,
    });
}

/// Collect the deduplicated same-origin asset worklist from a page.
///
/// `visited` is the job-scoped dedup set of absolute URLs; an image
/// referenced both via `src` and inside a `srcset` is queued once. The set
/// is shared with the CSS rewriter so nested discoveries dedup against the
/// same pool.
#[must_use]
pub fn collect_assets(html: &str, page_url: &Url, visited: &mut HashSet<String>) -> Vec<AssetRef> {
    let document = Html::parse_document(html);
    let mut assets = Vec::new();

    for element in document.select(&STYLESHEET_SELECTOR) {
        if let Some(href) = element.value().attr("href") {
            push_candidate(href, AssetKind::Stylesheet, page_url, &mut assets, visited);
        }
    }

    for element in document.select(&SCRIPT_SELECTOR) {
        if let Some(src) = element.value().attr("src") {
            push_candidate(src, AssetKind::Script, page_url, &mut assets, visited);
        }
    }

    for element in document.select(&IMG_SRC_SELECTOR) {
        if let Some(src) = element.value().attr("src") {
            push_candidate(src, AssetKind::Image, page_url, &mut assets, visited);
        }
    }

    for element in document.select(&IMG_SRCSET_SELECTOR) {
        if let Some(srcset) = element.value().attr("srcset") {
            for (candidate, _descriptor) in parse_srcset(srcset) {
                push_candidate(&candidate, AssetKind::Image, page_url, &mut assets, visited);
            }
        }
    }

    for element in document.select(&MEDIA_SELECTOR) {
        if let Some(src) = element.value().attr("src") {
            push_candidate(src, AssetKind::Media, page_url, &mut assets, visited);
        }
    }

    // Social preview images are downloaded for completeness only; the
    // rewrite pass never touches meta tags.
    for element in document.select(&META_IMAGE_SELECTOR) {
        if let Some(content) = element.value().attr("content") {
            push_candidate(content, AssetKind::Other, page_url, &mut assets, visited);
        }
    }

    log::debug!(
        "Collected {} same-origin assets from {page_url}",
        assets.len()
    );

    assets
}
