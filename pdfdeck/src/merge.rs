//! Core PDF merging implementation.
//!
//! Inputs are appended one after another onto a single flat page tree.
//! Object ids of each input are shifted past everything already in the
//! output, so inputs never collide with each other.

use anyhow::{Context, Result};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::Limits;
use crate::document::{MergeArtifact, SourceDocument, merged_file_name};
use crate::error::PdfDeckError;
use crate::pages::OutputDocument;
use crate::progress::{ProgressReporter, ProgressTracker};
use crate::utils::format_file_size;
use crate::validation::Validator;

/// Statistics about a merge operation.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of documents merged.
    pub files_merged: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Total size of the inputs.
    pub input_size: u64,

    /// Size of the merged output.
    pub output_size: u64,

    /// Time taken for the merge.
    pub merge_time: Duration,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }

    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// PDF merger that combines multiple documents.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    validator: Validator,
}

impl Merger {
    /// Create a merger enforcing `limits` on its inputs.
    pub fn new(limits: Limits) -> Self {
        Self {
            validator: Validator::new(limits),
        }
    }

    /// Merge `sources`, in order, into one document.
    ///
    /// Progress is reported once per input document. The task yields after
    /// each input.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` with fewer than two sources
    /// - `FileTooLarge` if the sources together exceed the merge ceiling
    /// - any failure while copying pages or serializing the output
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfdeck::merge::Merger;
    /// # use pdfdeck::document::SourceDocument;
    /// # use pdfdeck::progress::NoProgress;
    /// # async fn example(sources: Vec<SourceDocument>) -> anyhow::Result<()> {
    /// let (artifact, stats) = Merger::default().merge(&sources, &mut NoProgress).await?;
    /// println!("{} pages from {} files", artifact.page_count, stats.files_merged);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn merge<P>(
        &self,
        sources: &[SourceDocument],
        progress: &mut P,
    ) -> Result<(MergeArtifact, MergeStatistics)>
    where
        P: ProgressReporter + ?Sized,
    {
        let merge_start = Instant::now();

        self.validator
            .check_merge_batch(sources.iter().map(SourceDocument::size))?;
        let Some(first) = sources.first() else {
            return Err(PdfDeckError::NotEnoughDocuments { count: 0 }.into());
        };

        let total_files = sources.len();
        let mut output = OutputDocument::new(first.document.version.as_str());
        let mut tracker = ProgressTracker::new(progress, total_files);

        for (index, source) in sources.iter().enumerate() {
            let appended = output.append_document(&source.document).with_context(|| {
                format!(
                    "processing {} ({} of {total_files})",
                    source.name,
                    index + 1
                )
            })?;
            debug!(source = %source.name, pages = appended, "appended document");

            tracker.advance();
            tokio::task::yield_now().await;
        }

        let total_pages = output.page_count();
        let bytes = output.finish().context("processing merged document")?;

        let statistics = MergeStatistics {
            files_merged: total_files,
            total_pages,
            input_size: sources.iter().map(SourceDocument::size).sum(),
            output_size: bytes.len() as u64,
            merge_time: merge_start.elapsed(),
        };

        info!(
            files = total_files,
            pages = total_pages,
            input = %statistics.format_input_size(),
            output = %statistics.format_output_size(),
            "merge complete"
        );

        let artifact = MergeArtifact {
            file_name: merged_file_name(first.base_name()),
            bytes,
            page_count: total_pages,
            thumbnail: String::new(),
        };
        Ok((artifact, statistics))
    }
}
