//! sitemirror — best-effort single-page site cloning
//!
//! Given a page URL, fetch the document, discover its same-origin static
//! assets (stylesheets, scripts, images, media), download them with
//! bounded concurrency, rewrite every reference (HTML attributes, srcset
//! lists, CSS `url()` occurrences) to relative local paths, and persist the
//! result as a self-contained directory tree. Optionally package a job's
//! output as a zip archive.
//!
//! The pipeline is deliberately best-effort: a broken image on the source
//! page degrades the clone instead of aborting it. Only the initial page
//! fetch is fatal.

pub mod archiver;
pub mod asset_collector;
pub mod clone_job;
pub mod config;
pub mod css_rewriter;
pub mod downloader;
pub mod html_rewriter;
pub mod page_fetcher;
pub mod utils;

pub use archiver::create_zip_from_dir;
pub use asset_collector::{collect_assets, parse_srcset, AssetKind, AssetRef};
pub use clone_job::{run_clone_job, CloneError, CloneJobResult};
pub use config::CloneConfig;
pub use css_rewriter::rewrite_css;
pub use downloader::{download_assets, AssetFailure};
pub use html_rewriter::{inject_base_href, rewrite_html};
pub use page_fetcher::{fetch_page, FetchedPage};
pub use utils::{is_same_origin, local_asset_path};
