//! Rejections and failure classification.

use pdfdeck::config::MIB;
use pdfdeck::document::CandidateFile;
use pdfdeck::error::{ErrorKind, PdfDeckError};
use pdfdeck::progress::NoProgress;

use crate::common::{pdf_bytes, pipeline_without_thumbnails};

#[tokio::test]
async fn test_oversized_file_rejected_before_parsing() {
    // The bytes are junk: a parse attempt would report corruption instead.
    let candidate = CandidateFile {
        size: 101 * MIB,
        ..CandidateFile::new("huge.pdf", b"not a pdf".to_vec())
    };

    let err = pipeline_without_thumbnails()
        .split(candidate, &mut NoProgress)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FileTooLarge);
    assert!(matches!(err, PdfDeckError::FileTooLarge { size, .. } if size == 101 * MIB));
}

#[tokio::test]
async fn test_text_file_rejected() {
    let mut calls = 0;
    let mut progress = |_: usize, _: usize| calls += 1;

    let err = pipeline_without_thumbnails()
        .split(CandidateFile::new("notes.txt", b"hello".to_vec()), &mut progress)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidFileType);
    assert_eq!(calls, 0);
}

#[tokio::test]
async fn test_declared_type_mismatch_rejected() {
    let candidate =
        CandidateFile::new("report.pdf", pdf_bytes("r", 1)).with_declared_type("text/plain");
    let err = pipeline_without_thumbnails()
        .split(candidate, &mut NoProgress)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFileType);
}

#[tokio::test]
async fn test_corrupted_document() {
    let mut bytes = pdf_bytes("r", 2);
    bytes.truncate(40);

    let err = pipeline_without_thumbnails()
        .split(CandidateFile::new("broken.pdf", bytes), &mut NoProgress)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CorruptedDocument);
    let record = err.record();
    assert_eq!(record.kind, ErrorKind::CorruptedDocument);
    assert!(record.remedy.is_some());
}

#[tokio::test]
async fn test_merge_aggregate_limit() {
    let candidates: Vec<_> = ["a.pdf", "b.pdf", "c.pdf"]
        .into_iter()
        .map(|name| CandidateFile {
            size: 80 * MIB,
            ..CandidateFile::new(name, Vec::new())
        })
        .collect();

    let err = pipeline_without_thumbnails()
        .merge(candidates, &mut NoProgress)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileTooLarge);
}

#[tokio::test]
async fn test_merge_with_corrupted_member() {
    let err = pipeline_without_thumbnails()
        .merge(
            vec![
                CandidateFile::new("a.pdf", pdf_bytes("a", 1)),
                CandidateFile::new("b.pdf", b"%PDF-1.4 garbage".to_vec()),
            ],
            &mut NoProgress,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CorruptedDocument);
}

#[test]
fn test_every_kind_has_message_and_remedy() {
    for kind in ErrorKind::ALL {
        assert!(!kind.message().is_empty());
        assert!(kind.remedy().is_some());
    }
}
