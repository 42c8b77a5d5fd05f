//! Disk input and output for candidate files and artifacts.

pub mod reader;
pub mod writer;

pub use reader::{FileProbe, PdfReader};
pub use writer::{ArtifactWriter, WriteOptions, WriteStatistics};
