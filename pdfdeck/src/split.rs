//! Splitting a document into one PDF per page.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::document::{PageArtifact, SourceDocument, page_file_name};
use crate::pages::{OutputDocument, page_ids};
use crate::progress::{ProgressReporter, ProgressTracker};

/// Turns an n-page document into n standalone single-page documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct Splitter;

impl Splitter {
    /// Create a new splitter.
    pub fn new() -> Self {
        Self
    }

    /// Split `source` into one artifact per page, in page order.
    ///
    /// Each artifact is serialized into its own buffer and carries only the
    /// objects its page needs. `progress` is called after every page, and
    /// the task yields between pages so other work on the runtime can run.
    /// A document without pages yields an empty list.
    ///
    /// Thumbnails are left empty; the pipeline fills them in.
    pub async fn split<P>(
        &self,
        source: &SourceDocument,
        progress: &mut P,
    ) -> Result<Vec<PageArtifact>>
    where
        P: ProgressReporter + ?Sized,
    {
        let ids = page_ids(&source.document);
        let total = ids.len();
        let base = source.base_name();
        let mut artifacts = Vec::with_capacity(total);
        let mut tracker = ProgressTracker::new(progress, total);

        for (index, page_id) in ids.into_iter().enumerate() {
            let page_number = index + 1;

            let mut output = OutputDocument::for_source(&source.document);
            output
                .push_page(&source.document, page_id)
                .with_context(|| format!("processing page {page_number} of {total}"))?;
            let bytes = output
                .finish()
                .with_context(|| format!("processing page {page_number} of {total}"))?;

            debug!(page_number, size = bytes.len(), "extracted page");
            artifacts.push(PageArtifact {
                page_number,
                file_name: page_file_name(base, page_number, total),
                bytes,
                thumbnail: String::new(),
            });

            tracker.advance();
            tokio::task::yield_now().await;
        }

        info!(source = %source.name, pages = total, "split complete");
        Ok(artifacts)
    }
}
