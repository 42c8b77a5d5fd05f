//! pdfdeck - Split, merge, preview and bundle PDF documents locally.
//!
//! Everything runs in memory on the local machine:
//!
//! - Validation by name, declared type and size before anything is parsed
//! - Splitting a document into one single-page PDF per page
//! - Merging documents, in order, into one PDF
//! - JPEG thumbnails of the first page of every artifact
//! - Packaging artifacts into a ZIP archive
//! - A fixed error taxonomy with a user message and remedy per kind
//!
//! # Examples
//!
//! ## Split
//!
//! ```no_run
//! use pdfdeck::config::PipelineConfig;
//! use pdfdeck::document::CandidateFile;
//! use pdfdeck::Pipeline;
//!
//! # async fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::new(PipelineConfig::default());
//! let candidate = CandidateFile::new("report.pdf", bytes);
//!
//! let mut progress = |current: usize, total: usize| println!("{current}/{total}");
//! let outcome = pipeline.split(candidate, &mut progress).await?;
//! for page in &outcome.pages {
//!     println!("{} ({} bytes)", page.file_name, page.bytes.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Merge and package
//!
//! ```no_run
//! use pdfdeck::config::PipelineConfig;
//! use pdfdeck::document::CandidateFile;
//! use pdfdeck::progress::NoProgress;
//! use pdfdeck::Pipeline;
//!
//! # async fn example(a: Vec<u8>, b: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::new(PipelineConfig::default());
//! let inputs = vec![CandidateFile::new("a.pdf", a), CandidateFile::new("b.pdf", b)];
//!
//! let merged = pipeline.merge(inputs, &mut NoProgress).await?;
//! let zip = pipeline.package(&[merged.artifact])?;
//! println!("archive is {} bytes", zip.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod archive;
pub mod classify;
pub mod config;
pub mod document;
pub mod error;
pub mod io;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod session;
pub mod split;
pub mod thumbnail;
pub mod utils;
pub mod validation;

mod pages;

#[cfg(test)]
mod fixtures;

// Re-export commonly used types
pub use config::{Config, PipelineConfig};
pub use document::{Artifact, CandidateFile};
pub use error::{ErrorKind, ErrorRecord, PdfDeckError, Result};
pub use pipeline::{Outcome, Pipeline, Request};
pub use session::Session;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
