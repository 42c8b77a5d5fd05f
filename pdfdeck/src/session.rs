//! Tracking the operation a user is currently waiting on.
//!
//! There is no way to abort a running split or merge. Instead every started
//! operation gets a [`Ticket`], and only the result carrying the newest
//! ticket is accepted. Results of superseded operations are dropped.

use tracing::{debug, warn};

use crate::error::{ErrorRecord, PdfDeckError};
use crate::pipeline::{Outcome, Pipeline, Request};
use crate::progress::ProgressReporter;

/// Identifies one started operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Where the session stands.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// Nothing started yet, or reset.
    #[default]
    Idle,
    /// An operation is running.
    Processing(Ticket),
    /// The latest operation finished.
    Completed(Outcome),
    /// The latest operation failed.
    Failed(ErrorRecord),
}

/// One user's working session.
#[derive(Debug, Default)]
pub struct Session {
    issued: u64,
    state: SessionState,
    last_request: Option<Request>,
}

impl Session {
    /// Fresh, idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Outcome of the latest operation, if it succeeded.
    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.state {
            SessionState::Completed(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Start tracking `request`. Any operation still running is superseded.
    pub fn begin(&mut self, request: Request) -> Ticket {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        if let SessionState::Processing(previous) = self.state {
            debug!(?previous, ?ticket, "superseding running operation");
        }
        self.state = SessionState::Processing(ticket);
        self.last_request = Some(request);
        ticket
    }

    /// Record the result of the operation behind `ticket`.
    ///
    /// Returns `false`, leaving the session untouched, if `ticket` is not the
    /// newest one issued or the session was reset in the meantime.
    pub fn complete(&mut self, ticket: Ticket, result: Result<Outcome, PdfDeckError>) -> bool {
        if !matches!(self.state, SessionState::Processing(current) if current == ticket) {
            warn!(?ticket, "dropping result of a superseded operation");
            return false;
        }

        self.state = match result {
            Ok(outcome) => SessionState::Completed(outcome),
            Err(err) => SessionState::Failed(err.record()),
        };
        true
    }

    /// Start `request` on `pipeline` and record its result.
    pub async fn run<P>(
        &mut self,
        pipeline: &Pipeline,
        request: Request,
        progress: &mut P,
    ) -> &SessionState
    where
        P: ProgressReporter + ?Sized,
    {
        let ticket = self.begin(request.clone());
        let result = pipeline.execute(request, progress).await;
        self.complete(ticket, result);
        &self.state
    }

    /// The request to replay for a retry: identical to the last one started.
    pub fn retry_request(&self) -> Option<Request> {
        self.last_request.clone()
    }

    /// Drop all results and the remembered request.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.last_request = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PipelineConfig, ThumbnailOptions};
    use crate::document::CandidateFile;
    use crate::error::ErrorKind;
    use crate::fixtures::sample_pdf;
    use crate::pipeline::SplitOutcome;
    use crate::progress::NoProgress;
    use crate::validation::DocumentInfo;

    fn split_outcome(name: &str) -> Outcome {
        Outcome::Split(SplitOutcome {
            source_name: name.to_string(),
            info: DocumentInfo::default(),
            pages: Vec::new(),
            memory_advisory: None,
        })
    }

    fn request(name: &str) -> Request {
        Request::Split(CandidateFile::new(name, Vec::new()))
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut session = Session::new();
        let first = session.begin(request("a.pdf"));
        let second = session.begin(request("b.pdf"));

        assert!(!session.complete(first, Ok(split_outcome("a.pdf"))));
        assert!(matches!(session.state(), SessionState::Processing(t) if *t == second));

        assert!(session.complete(second, Ok(split_outcome("b.pdf"))));
        match session.outcome() {
            Some(Outcome::Split(split)) => assert_eq!(split.source_name, "b.pdf"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_failure_is_recorded_as_record() {
        let mut session = Session::new();
        let ticket = session.begin(request("a.pdf"));
        session.complete(ticket, Err(PdfDeckError::corrupted("a.pdf", "bad xref")));

        match session.state() {
            SessionState::Failed(record) => {
                assert_eq!(record.kind, ErrorKind::CorruptedDocument);
                assert!(record.remedy.is_some());
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn test_retry_returns_same_request() {
        let mut session = Session::new();
        let original = Request::Merge(vec![
            CandidateFile::new("a.pdf", vec![1]),
            CandidateFile::new("b.pdf", vec![2]),
        ]);
        let ticket = session.begin(original.clone());
        session.complete(ticket, Err(PdfDeckError::classified(ErrorKind::UnknownError, "x")));

        assert_eq!(session.retry_request(), Some(original));
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut session = Session::new();
        let ticket = session.begin(request("a.pdf"));
        session.reset();

        assert!(matches!(session.state(), SessionState::Idle));
        assert!(session.retry_request().is_none());
        // A result arriving after reset is not accepted.
        assert!(!session.complete(ticket, Ok(split_outcome("a.pdf"))));
        assert!(session.outcome().is_none());
    }

    #[tokio::test]
    async fn test_run_through_pipeline() {
        let pipeline = Pipeline::new(PipelineConfig {
            thumbnails: ThumbnailOptions::disabled(),
            ..PipelineConfig::default()
        });
        let mut session = Session::new();

        let state = session
            .run(
                &pipeline,
                Request::Split(CandidateFile::new("s.pdf", sample_pdf("s", 2))),
                &mut NoProgress,
            )
            .await;
        assert!(matches!(state, SessionState::Completed(Outcome::Split(s)) if s.pages.len() == 2));

        let state = session
            .run(
                &pipeline,
                Request::Merge(vec![CandidateFile::new("only.pdf", sample_pdf("o", 1))]),
                &mut NoProgress,
            )
            .await;
        assert!(matches!(state, SessionState::Failed(r) if r.kind == ErrorKind::InvalidInput));
    }
}
