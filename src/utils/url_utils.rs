//! URL and path manipulation utilities.
//!
//! This module provides functions for working with URLs and local asset
//! paths in the context of single-page mirroring.

use url::Url;

use super::constants::{ROOT_ASSET_DEFAULT_EXT, ROOT_ASSET_STEM};

/// Compute the deterministic relative local path for an asset URL.
///
/// Takes the URL's path component (query and fragment are excluded by
/// construction), strips a single leading and a single trailing slash, and
/// preserves the rest verbatim so distinct asset paths essentially never
/// collide. An asset at the origin root normalizes to `file.<ext>`, where
/// `<ext>` comes from a `format` query parameter when present.
///
/// The same URL always maps to the same path; this function never fails.
#[must_use]
pub fn local_asset_path(url: &Url) -> String {
    let path = url.path();
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);

    if path.is_empty() {
        let ext = url
            .query_pairs()
            .find(|(key, _)| key == "format")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_else(|| ROOT_ASSET_DEFAULT_EXT.to_string());
        return format!("{ROOT_ASSET_STEM}.{ext}");
    }

    path.to_string()
}

/// Check whether two URLs share scheme, host, and port.
///
/// Cross-origin references (CDNs, third-party trackers) are left untouched
/// in the output, so this predicate is the single gate for every mirror
/// decision.
#[must_use]
pub fn is_same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}

/// Check if a raw attribute value is worth treating as an asset URL.
///
/// Skips data URLs, javascript URLs, and other non-fetchable schemes.
#[must_use]
pub fn is_fetchable_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    !(url.starts_with("data:")
        || url.starts_with("javascript:")
        || url.starts_with("mailto:")
        || url.starts_with("tel:"))
}

/// Resolve a potentially relative URL against a base URL.
///
/// Returns `None` when the candidate cannot be joined; per-asset tolerance
/// means a malformed reference is skipped, never fatal.
#[must_use]
pub fn resolve_url(base: &Url, candidate: &str) -> Option<Url> {
    base.join(candidate).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).expect("test URL must parse")
    }

    #[test]
    fn test_local_path_strips_query_and_fragment() {
        assert_eq!(
            local_asset_path(&url("https://a.com/img/logo.png?x=1#frag")),
            "img/logo.png"
        );
        // Two URLs differing only by query normalize identically
        assert_eq!(
            local_asset_path(&url("https://a.com/img.png?x=1")),
            local_asset_path(&url("https://a.com/img.png?x=2"))
        );
    }

    #[test]
    fn test_local_path_is_idempotent() {
        let u = url("https://a.com/assets/app.js");
        assert_eq!(local_asset_path(&u), local_asset_path(&u));
        assert_eq!(local_asset_path(&u), "assets/app.js");
    }

    #[test]
    fn test_local_path_trailing_slash() {
        assert_eq!(local_asset_path(&url("https://a.com/media/")), "media");
    }

    #[test]
    fn test_root_asset_synthesizes_filename() {
        assert_eq!(local_asset_path(&url("https://a.com/")), "file.bin");
        assert_eq!(
            local_asset_path(&url("https://a.com/?format=webp")),
            "file.webp"
        );
    }

    #[test]
    fn test_same_origin_requires_scheme_host_port() {
        let page = url("https://a.com/index.html");
        assert!(is_same_origin(&page, &url("https://a.com/style.css")));
        assert!(!is_same_origin(&page, &url("https://b.com/other.css")));
        assert!(!is_same_origin(&page, &url("http://a.com/style.css")));
        assert!(!is_same_origin(&page, &url("https://a.com:8443/style.css")));
    }

    #[test]
    fn test_fetchable_url_filters_special_schemes() {
        assert!(is_fetchable_url("/img/logo.png"));
        assert!(is_fetchable_url("https://a.com/app.js"));
        assert!(!is_fetchable_url(""));
        assert!(!is_fetchable_url("data:image/png;base64,iVBOR"));
        assert!(!is_fetchable_url("mailto:team@a.com"));
        assert!(!is_fetchable_url("tel:+15551234"));
        assert!(!is_fetchable_url("javascript:void(0)"));
    }

    #[test]
    fn test_resolve_url_relative() {
        let base = url("https://a.com/css/main.css");
        let resolved = resolve_url(&base, "../img/bg.png").expect("must resolve");
        assert_eq!(resolved.as_str(), "https://a.com/img/bg.png");
    }
}
