//! Attribute rewriting over the fetched page
//!
//! The rewrite pass re-resolves each attribute's URL independently of the
//! collection pass and substitutes the local path only when the value is
//! still present and same-origin. That makes rewriting idempotent and
//! tolerant of anything that changed between passes. Serialization falls
//! out of the streaming rewrite.

use anyhow::Result;
use lol_html::html_content::ContentType;
use lol_html::{element, HtmlRewriter, Settings};
use url::Url;

use crate::asset_collector::parse_srcset;
use crate::utils::url_utils::{is_fetchable_url, is_same_origin, local_asset_path, resolve_url};

/// Attribute rewrite targets: one handler per element/attribute pair.
/// Meta preview tags are collected for download but never rewritten.
const REWRITE_TARGETS: [(&str, &str); 6] = [
    ("link[rel=\"stylesheet\"]", "href"),
    ("script[src]", "src"),
    ("img[src]", "src"),
    ("source[src]", "src"),
    ("video[src]", "src"),
    ("audio[src]", "src"),
];

/// Compute the local replacement for a raw attribute value, if any.
fn local_rewrite(page_url: &Url, raw: &str) -> Option<String> {
    if !is_fetchable_url(raw) {
        return None;
    }
    let resolved = resolve_url(page_url, raw)?;
    if !is_same_origin(page_url, &resolved) {
        return None;
    }
    Some(local_asset_path(&resolved))
}

/// Rewrite a `srcset` value, preserving each candidate's descriptor verbatim.
///
/// Candidates that fail to resolve or are cross-origin pass through
/// unchanged.
fn rewrite_srcset(page_url: &Url, srcset: &str) -> String {
    parse_srcset(srcset)
        .into_iter()
        .map(|(candidate, descriptor)| {
            let target = local_rewrite(page_url, &candidate).unwrap_or(candidate);
            match descriptor {
                Some(descriptor) => format!("{target} {descriptor}"),
                None => target,
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Rewrite every same-origin asset reference in the document to its local
/// path and serialize the result.
pub fn rewrite_html(html: &str, page_url: &Url) -> Result<String> {
    let mut handlers = Vec::new();

    for (selector, attr) in REWRITE_TARGETS {
        let page = page_url.clone();
        handlers.push(element!(selector, move |el| {
            if let Some(value) = el.get_attribute(attr)
                && let Some(local) = local_rewrite(&page, &value)
            {
                el.set_attribute(attr, &local)?;
            }
            Ok(())
        }));
    }

    let page = page_url.clone();
    handlers.push(element!("img[srcset]", move |el| {
        if let Some(srcset) = el.get_attribute("srcset") {
            el.set_attribute("srcset", &rewrite_srcset(&page, &srcset))?;
        }
        Ok(())
    }));

    let mut output = Vec::new();
    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: handlers,
            ..Settings::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter
        .write(html.as_bytes())
        .map_err(|e| anyhow::anyhow!("HtmlRewriter error: {e}"))?;
    rewriter
        .end()
        .map_err(|e| anyhow::anyhow!("HtmlRewriter end error: {e}"))?;

    String::from_utf8(output).map_err(|e| anyhow::anyhow!("Invalid UTF-8 in rewritten HTML: {e}"))
}

/// Insert a `<base href>` at the start of `<head>`.
///
/// An empty `base` means the deployment target cannot serve the written
/// files; the function is then a pass-through and the document keeps its
/// original absolute URLs.
pub fn inject_base_href(html: &str, base: &str) -> Result<String> {
    if base.is_empty() {
        return Ok(html.to_string());
    }

    let tag = format!("<base href=\"{base}\">");

    let mut output = Vec::new();
    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![element!("head", move |el| {
                el.prepend(&tag, ContentType::Html);
                Ok(())
            })],
            ..Settings::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter
        .write(html.as_bytes())
        .map_err(|e| anyhow::anyhow!("HtmlRewriter error: {e}"))?;
    rewriter
        .end()
        .map_err(|e| anyhow::anyhow!("HtmlRewriter end error: {e}"))?;

    String::from_utf8(output).map_err(|e| anyhow::anyhow!("Invalid UTF-8 in rewritten HTML: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://a.com/index.html").expect("test URL must parse")
    }

    #[test]
    fn test_same_origin_attributes_rewritten() {
        let html = r#"<link rel="stylesheet" href="/css/main.css"><script src="/js/app.js"></script>"#;
        let rewritten = rewrite_html(html, &page()).expect("rewrite must succeed");

        assert!(rewritten.contains(r#"href="css/main.css""#));
        assert!(rewritten.contains(r#"src="js/app.js""#));
    }

    #[test]
    fn test_cross_origin_attribute_untouched() {
        let html = r#"<link rel="stylesheet" href="https://b.com/other.css">"#;
        let rewritten = rewrite_html(html, &page()).expect("rewrite must succeed");

        assert!(rewritten.contains(r#"href="https://b.com/other.css""#));
    }

    #[test]
    fn test_srcset_descriptors_preserved() {
        let html = r#"<img srcset="/img/a.png 1x, /img/b.png 2x" src="/img/a.png">"#;
        let rewritten = rewrite_html(html, &page()).expect("rewrite must succeed");

        assert!(rewritten.contains(r#"srcset="img/a.png 1x, img/b.png 2x""#));
        assert!(rewritten.contains(r#"src="img/a.png""#));
    }

    #[test]
    fn test_srcset_unresolvable_candidate_passes_through() {
        let html = r#"<img srcset="https://b.com/a.png 1x, /img/b.png 2x">"#;
        let rewritten = rewrite_html(html, &page()).expect("rewrite must succeed");

        assert!(rewritten.contains(r#"srcset="https://b.com/a.png 1x, img/b.png 2x""#));
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let html = r#"<img src="/img/a.png">"#;
        let once = rewrite_html(html, &page()).expect("rewrite must succeed");
        let twice = rewrite_html(&once, &page()).expect("rewrite must succeed");

        assert_eq!(once, twice);
    }

    #[test]
    fn test_meta_tags_never_rewritten() {
        let html = r#"<head><meta property="og:image" content="/social/card.png"></head>"#;
        let rewritten = rewrite_html(html, &page()).expect("rewrite must succeed");

        assert!(rewritten.contains(r#"content="/social/card.png""#));
    }

    #[test]
    fn test_inject_base_href_empty_is_passthrough() {
        let html = "<html><head><title>t</title></head><body></body></html>";
        let out = inject_base_href(html, "").expect("inject must succeed");
        assert_eq!(out, html);
    }

    #[test]
    fn test_inject_base_href_prepends_to_head() {
        let html = "<html><head><title>t</title></head><body></body></html>";
        let out = inject_base_href(html, "/clones/job-1/").expect("inject must succeed");
        assert!(out.contains(r#"<head><base href="/clones/job-1/"><title>"#));
    }
}
