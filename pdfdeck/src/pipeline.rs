//! The user-facing boundary of the library.
//!
//! A [`Pipeline`] runs validate, parse, transform and thumbnail in that
//! order. Cheap checks happen before anything is parsed. Failures from the
//! transform stages are classified exactly once, here, so every error that
//! leaves the pipeline is a [`PdfDeckError`] with a fixed kind.

use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::archive::{ArchiveEntry, ArchiveError, ArchivePackager};
use crate::classify::classify;
use crate::config::PipelineConfig;
use crate::document::{Artifact, CandidateFile, MergeArtifact, PageArtifact, SourceDocument};
use crate::error::Result;
use crate::merge::{MergeStatistics, Merger};
use crate::progress::ProgressReporter;
use crate::split::Splitter;
use crate::thumbnail::{PageRasterizer, ThumbnailRenderer};
use crate::validation::{DocumentInfo, MemoryAdvisory, Validator};

/// Result of splitting one document.
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    /// Name of the split document.
    pub source_name: String,
    /// Summary of the split document.
    pub info: DocumentInfo,
    /// One artifact per page, in page order.
    pub pages: Vec<PageArtifact>,
    /// Present when the document looked large for the memory available.
    pub memory_advisory: Option<MemoryAdvisory>,
}

/// Result of merging several documents.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The merged document.
    pub artifact: MergeArtifact,
    /// Merge statistics.
    pub statistics: MergeStatistics,
    /// One entry per input that looked large for the memory available.
    pub memory_advisories: Vec<MemoryAdvisory>,
}

/// An operation a user can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Split one document into pages.
    Split(CandidateFile),
    /// Merge documents, in order.
    Merge(Vec<CandidateFile>),
}

/// What a finished [`Request`] produced.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Pages of a split.
    Split(SplitOutcome),
    /// A merged document.
    Merge(MergeOutcome),
}

impl Outcome {
    /// Every artifact the outcome holds.
    pub fn artifacts(&self) -> Vec<&dyn Artifact> {
        match self {
            Self::Split(split) => split.pages.iter().map(|p| p as &dyn Artifact).collect(),
            Self::Merge(merge) => vec![&merge.artifact as &dyn Artifact],
        }
    }
}

/// Runs split and merge requests end to end.
#[derive(Debug, Clone)]
pub struct Pipeline {
    validator: Validator,
    splitter: Splitter,
    merger: Merger,
    thumbnails: ThumbnailRenderer,
    packager: ArchivePackager,
}

impl Pipeline {
    /// Pipeline rendering thumbnails with pdfium.
    pub fn new(config: PipelineConfig) -> Self {
        let thumbnails = ThumbnailRenderer::new(config.thumbnails.clone());
        Self::build(config, thumbnails)
    }

    /// Pipeline rendering thumbnails with a custom rasteriser.
    pub fn with_rasterizer(config: PipelineConfig, rasterizer: Arc<dyn PageRasterizer>) -> Self {
        let thumbnails = ThumbnailRenderer::with_rasterizer(rasterizer, config.thumbnails.clone());
        Self::build(config, thumbnails)
    }

    fn build(config: PipelineConfig, thumbnails: ThumbnailRenderer) -> Self {
        Self {
            validator: Validator::new(config.limits).with_memory_probe(config.memory_probe),
            splitter: Splitter::new(),
            merger: Merger::new(config.limits),
            thumbnails,
            packager: ArchivePackager::new(),
        }
    }

    /// The validator used for incoming files.
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Split `candidate` into one PDF per page.
    ///
    /// # Errors
    ///
    /// Validation errors come back before anything is parsed. Any failure
    /// during the split itself is classified; no partial result is returned.
    pub async fn split<P>(
        &self,
        candidate: CandidateFile,
        progress: &mut P,
    ) -> Result<SplitOutcome>
    where
        P: ProgressReporter + ?Sized,
    {
        let started = Instant::now();
        let source = self.validator.load(candidate)?;
        let info = DocumentInfo::from_source(&source);

        let mut pages = self
            .splitter
            .split(&source, progress)
            .await
            .map_err(classify)?;

        for page in &mut pages {
            page.thumbnail = self.thumbnails.render(&page.bytes).await;
        }

        info!(
            source = %source.name,
            pages = pages.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "split request finished"
        );
        Ok(SplitOutcome {
            source_name: source.name,
            info,
            pages,
            memory_advisory: source.memory_advisory,
        })
    }

    /// Merge `candidates`, in order, into one PDF.
    ///
    /// The document count and the combined size are checked before any
    /// candidate is validated or parsed. Candidates are then validated in
    /// order and the first failure is returned.
    pub async fn merge<P>(
        &self,
        candidates: Vec<CandidateFile>,
        progress: &mut P,
    ) -> Result<MergeOutcome>
    where
        P: ProgressReporter + ?Sized,
    {
        let started = Instant::now();
        self.validator
            .check_merge_batch(candidates.iter().map(|c| c.size))?;
        for candidate in &candidates {
            self.validator.check(candidate)?;
        }

        let sources = candidates
            .into_iter()
            .map(|candidate| self.validator.load(candidate))
            .collect::<Result<Vec<SourceDocument>>>()?;
        let memory_advisories = sources.iter().filter_map(|s| s.memory_advisory).collect();

        let (mut artifact, statistics) = self
            .merger
            .merge(&sources, progress)
            .await
            .map_err(classify)?;
        artifact.thumbnail = self.thumbnails.render(&artifact.bytes).await;

        info!(
            output = %artifact.file_name,
            pages = artifact.page_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "merge request finished"
        );
        Ok(MergeOutcome {
            artifact,
            statistics,
            memory_advisories,
        })
    }

    /// Run any request.
    pub async fn execute<P>(&self, request: Request, progress: &mut P) -> Result<Outcome>
    where
        P: ProgressReporter + ?Sized,
    {
        match request {
            Request::Split(candidate) => {
                self.split(candidate, progress).await.map(Outcome::Split)
            }
            Request::Merge(candidates) => {
                self.merge(candidates, progress).await.map(Outcome::Merge)
            }
        }
    }

    /// Bundle `artifacts` into a ZIP archive. Archive failures are returned
    /// as-is, without classification.
    pub fn package<A: Artifact>(
        &self,
        artifacts: &[A],
    ) -> std::result::Result<Vec<u8>, ArchiveError> {
        let entries: Vec<_> = artifacts.iter().map(ArchiveEntry::from_artifact).collect();
        self.packager.package(&entries)
    }
}
