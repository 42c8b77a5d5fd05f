//! Merging documents end to end.

use pdfdeck::document::CandidateFile;
use pdfdeck::error::ErrorKind;
use pdfdeck::progress::NoProgress;

use crate::common::{pdf_bytes, pipeline, pipeline_without_thumbnails, tags_of};

#[tokio::test]
async fn test_merge_two_documents() {
    let mut updates = Vec::new();
    let mut progress = |current: usize, total: usize| updates.push((current, total));

    let outcome = pipeline_without_thumbnails()
        .merge(
            vec![
                CandidateFile::new("a.pdf", pdf_bytes("a", 2)),
                CandidateFile::new("b.pdf", pdf_bytes("b", 3)),
            ],
            &mut progress,
        )
        .await
        .unwrap();

    assert_eq!(outcome.artifact.file_name, "a_merged.pdf");
    assert_eq!(outcome.artifact.page_count, 5);
    assert_eq!(outcome.statistics.files_merged, 2);
    assert_eq!(outcome.statistics.total_pages, 5);
    assert_eq!(
        tags_of(&outcome.artifact.bytes),
        ["a-1", "a-2", "b-1", "b-2", "b-3"]
    );
    assert_eq!(updates, vec![(1, 2), (2, 2)]);
}

#[tokio::test]
async fn test_merge_follows_input_order() {
    let outcome = pipeline_without_thumbnails()
        .merge(
            vec![
                CandidateFile::new("z.pdf", pdf_bytes("z", 1)),
                CandidateFile::new("m.pdf", pdf_bytes("m", 1)),
                CandidateFile::new("a.pdf", pdf_bytes("a", 1)),
            ],
            &mut NoProgress,
        )
        .await
        .unwrap();

    assert_eq!(outcome.artifact.file_name, "z_merged.pdf");
    assert_eq!(tags_of(&outcome.artifact.bytes), ["z-1", "m-1", "a-1"]);
}

#[tokio::test]
async fn test_merge_single_document_rejected() {
    let mut calls = 0;
    let mut progress = |_: usize, _: usize| calls += 1;

    let err = pipeline_without_thumbnails()
        .merge(vec![CandidateFile::new("a.pdf", pdf_bytes("a", 2))], &mut progress)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(calls, 0);
}

#[tokio::test]
async fn test_merge_renders_thumbnail() {
    let outcome = pipeline()
        .merge(
            vec![
                CandidateFile::new("a.pdf", pdf_bytes("a", 1)),
                CandidateFile::new("b.pdf", pdf_bytes("b", 1)),
            ],
            &mut NoProgress,
        )
        .await
        .unwrap();
    assert!(outcome.artifact.thumbnail.starts_with("data:image/jpeg;base64,"));
}
