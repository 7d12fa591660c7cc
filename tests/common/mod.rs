//! Test utilities and helper functions for the sitemirror test suite

use std::path::Path;

use anyhow::Result;
use sitemirror::CloneConfig;
use tempfile::TempDir;

/// Initializes logging for a test run; safe to call more than once
#[allow(dead_code)]
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test output
#[allow(dead_code)]
pub fn create_test_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a clone config rooted at a test directory
#[allow(dead_code)]
pub fn test_config(root: &Path) -> CloneConfig {
    CloneConfig::default().with_output_root(root)
}

/// Creates a test HTML document with the given head and body content
#[allow(dead_code)]
pub fn create_test_html(head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    {head}
</head>
<body>
    {body}
</body>
</html>"#
    )
}
