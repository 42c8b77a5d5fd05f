//! Packaging artifacts into a ZIP archive.

use pdfdeck::archive::{ArchiveEntry, ArchivePackager};
use pdfdeck::document::CandidateFile;
use pdfdeck::progress::NoProgress;
use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::common::{pdf_bytes, pipeline_without_thumbnails};

#[tokio::test]
async fn test_package_split_pages() {
    let pipeline = pipeline_without_thumbnails();
    let outcome = pipeline
        .split(CandidateFile::new("report.pdf", pdf_bytes("r", 3)), &mut NoProgress)
        .await
        .unwrap();

    let bytes = pipeline.package(&outcome.pages).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 3);

    for (index, page) in outcome.pages.iter().enumerate() {
        let mut entry = archive.by_index(index).unwrap();
        assert_eq!(entry.name(), page.file_name);
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).unwrap();
        assert_eq!(contents, page.bytes);
    }
}

#[test]
fn test_package_named_defaults() {
    let entries = [ArchiveEntry {
        name: "x.pdf",
        bytes: b"%PDF-1.4",
    }];
    let archive = ArchivePackager::new().package_named(&entries, None).unwrap();
    assert_eq!(archive.name, "pdf_pages.zip");
    assert_eq!(archive.mime_type(), "application/zip");

    let named = ArchivePackager::new()
        .package_named(&entries, Some("bundle.zip"))
        .unwrap();
    assert_eq!(named.name, "bundle.zip");
}

#[test]
fn test_package_empty() {
    let bytes = ArchivePackager::new().package(&[]).unwrap();
    let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 0);
}
