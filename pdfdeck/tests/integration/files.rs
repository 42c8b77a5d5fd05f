//! Reading inputs from disk and writing results back.

use pdfdeck::config::MANIFEST_FILE_NAME;
use pdfdeck::error::{ErrorKind, PdfDeckError};
use pdfdeck::io::{ArtifactWriter, PdfReader};
use pdfdeck::output::Manifest;
use pdfdeck::progress::NoProgress;
use pdfdeck::{Artifact, Outcome};
use tempfile::TempDir;

use crate::common::{pdf_bytes, pipeline_without_thumbnails, tags_of};

#[tokio::test]
async fn test_split_from_disk_to_disk() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    let path = input_dir.path().join("report.pdf");
    tokio::fs::write(&path, pdf_bytes("r", 3)).await.unwrap();

    let candidate = PdfReader::new().read(&path).await.unwrap();
    let outcome = pipeline_without_thumbnails()
        .split(candidate, &mut NoProgress)
        .await
        .unwrap();

    let writer = ArtifactWriter::new();
    let stats = writer
        .write_artifacts(output_dir.path(), &outcome.pages)
        .await
        .unwrap();
    assert_eq!(stats.len(), 3);

    let second = std::fs::read(output_dir.path().join("report_page_02.pdf")).unwrap();
    assert_eq!(tags_of(&second), ["r-2"]);

    // A second run refuses to clobber.
    let err = writer
        .write_artifacts(output_dir.path(), &outcome.pages)
        .await
        .unwrap_err();
    assert!(matches!(err, PdfDeckError::OutputExists { .. }));
}

#[tokio::test]
async fn test_manifest_written_next_to_artifacts() {
    let output_dir = TempDir::new().unwrap();
    let pipeline = pipeline_without_thumbnails();
    let outcome = pipeline
        .split(
            pdfdeck::CandidateFile::new("deck.pdf", pdf_bytes("d", 2)),
            &mut NoProgress,
        )
        .await
        .unwrap();
    let outcome = Outcome::Split(outcome);

    let manifest = Manifest::from_outcomes(std::slice::from_ref(&outcome), vec!["deck.pdf".into()]);
    let json = manifest.to_json().unwrap();
    ArtifactWriter::new()
        .write(output_dir.path(), MANIFEST_FILE_NAME, json.as_bytes())
        .await
        .unwrap();

    let written = std::fs::read_to_string(output_dir.path().join("manifest.json")).unwrap();
    let parsed: Manifest = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(parsed.entries[1].file_name, "deck_page_02.pdf");
    assert_eq!(
        parsed.entries[1].size,
        outcome.artifacts()[1].bytes().len() as u64
    );
}

#[tokio::test]
async fn test_reader_rejects_wrong_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    tokio::fs::write(&path, b"just text").await.unwrap();

    let err = PdfReader::new().read(&path).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFileType);
}
