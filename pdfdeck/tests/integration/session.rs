//! Session bookkeeping around pipeline runs.

use pdfdeck::document::CandidateFile;
use pdfdeck::error::ErrorKind;
use pdfdeck::progress::NoProgress;
use pdfdeck::session::SessionState;
use pdfdeck::{Outcome, Request, Session};

use crate::common::{pdf_bytes, pipeline_without_thumbnails};

#[tokio::test]
async fn test_retry_after_failure_replays_request() {
    let pipeline = pipeline_without_thumbnails();
    let mut session = Session::new();
    let request = Request::Merge(vec![CandidateFile::new("a.pdf", pdf_bytes("a", 1))]);

    let state = session.run(&pipeline, request.clone(), &mut NoProgress).await;
    assert!(matches!(
        state,
        SessionState::Failed(record) if record.kind == ErrorKind::InvalidInput
    ));

    let retry = session.retry_request().unwrap();
    assert_eq!(retry, request);
}

#[tokio::test]
async fn test_superseded_result_is_ignored() {
    let pipeline = pipeline_without_thumbnails();
    let mut session = Session::new();

    let first = Request::Split(CandidateFile::new("first.pdf", pdf_bytes("f", 1)));
    let stale_ticket = session.begin(first.clone());
    let stale = pipeline.execute(first, &mut NoProgress).await;

    let second = Request::Split(CandidateFile::new("second.pdf", pdf_bytes("s", 2)));
    session.run(&pipeline, second, &mut NoProgress).await;

    assert!(!session.complete(stale_ticket, stale));
    match session.outcome() {
        Some(Outcome::Split(split)) => {
            assert_eq!(split.source_name, "second.pdf");
            assert_eq!(split.pages.len(), 2);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_reset_after_success() {
    let pipeline = pipeline_without_thumbnails();
    let mut session = Session::new();
    let request = Request::Split(CandidateFile::new("r.pdf", pdf_bytes("r", 1)));

    session.run(&pipeline, request, &mut NoProgress).await;
    assert!(session.outcome().is_some());

    session.reset();
    assert!(matches!(session.state(), SessionState::Idle));
    assert!(session.retry_request().is_none());
}
