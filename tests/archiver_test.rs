//! Archiver tests: entry layout and immediate readability

mod common;

use std::io::Read;

use common::create_test_dir;
use sitemirror::create_zip_from_dir;

#[tokio::test]
async fn test_zip_contains_directory_contents_at_root() {
    let dir = create_test_dir().expect("Failed to create test dir");
    let job_dir = dir.path().join("job");
    tokio::fs::create_dir_all(job_dir.join("img"))
        .await
        .expect("Failed to create job tree");
    tokio::fs::write(job_dir.join("index.html"), "<html></html>")
        .await
        .expect("Failed to write index.html");
    tokio::fs::write(job_dir.join("img/bg.png"), "bg-bytes")
        .await
        .expect("Failed to write asset");

    let out_path = dir.path().join("archives/job.zip");
    create_zip_from_dir(&job_dir, &out_path)
        .await
        .expect("Archiving must succeed");

    // Readable immediately after the future resolves
    let file = std::fs::File::open(&out_path).expect("Zip must exist and be readable");
    let mut archive = zip::ZipArchive::new(file).expect("Zip must parse");

    let mut names: Vec<String> = (0..archive.len())
        .map(|i| {
            archive
                .by_index(i)
                .expect("Zip entry must be readable")
                .name()
                .to_string()
        })
        .collect();
    names.sort();

    // Contents at the archive root, no wrapping job directory
    assert_eq!(names, vec!["img/bg.png".to_string(), "index.html".to_string()]);
}

#[tokio::test]
async fn test_zip_round_trips_file_contents() {
    let dir = create_test_dir().expect("Failed to create test dir");
    let job_dir = dir.path().join("job");
    tokio::fs::create_dir_all(&job_dir)
        .await
        .expect("Failed to create job dir");
    tokio::fs::write(job_dir.join("index.html"), "<html><body>hi</body></html>")
        .await
        .expect("Failed to write index.html");

    let out_path = dir.path().join("job.zip");
    create_zip_from_dir(&job_dir, &out_path)
        .await
        .expect("Archiving must succeed");

    let file = std::fs::File::open(&out_path).expect("Zip must open");
    let mut archive = zip::ZipArchive::new(file).expect("Zip must parse");
    let mut entry = archive
        .by_name("index.html")
        .expect("index.html entry must exist");
    let mut contents = String::new();
    entry
        .read_to_string(&mut contents)
        .expect("Entry must decompress");

    assert_eq!(contents, "<html><body>hi</body></html>");
}

#[tokio::test]
async fn test_zip_of_missing_directory_fails() {
    let dir = create_test_dir().expect("Failed to create test dir");

    let err = create_zip_from_dir(&dir.path().join("nope"), &dir.path().join("out.zip"))
        .await
        .expect_err("Archiving a missing directory must fail");

    assert!(err.to_string().contains("Failed to read directory"));
}
