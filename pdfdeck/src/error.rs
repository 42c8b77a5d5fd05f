//! Error types for pdfdeck.
//!
//! Every failure the pipeline hands back to a caller is a [`PdfDeckError`].
//! Each variant belongs to exactly one [`ErrorKind`], fixed at construction,
//! so a failure typed by an early stage (validation, merge preconditions)
//! keeps its kind all the way to the caller.
//!
//! # Error Kinds
//!
//! - **InvalidFileType**: wrong extension or declared MIME type
//! - **FileTooLarge**: a single file or a merge batch exceeds its ceiling
//! - **CorruptedDocument**: bytes were accepted but do not parse as a PDF
//! - **ProcessingError**: a split/merge/write step failed
//! - **MemoryError**: the host ran out of memory
//! - **InvalidInput**: merge was asked to combine fewer than two documents
//! - **UnknownError**: anything the classifier cannot place

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfdeck operations.
pub type Result<T> = std::result::Result<T, PdfDeckError>;

/// The fixed set of failure categories surfaced to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// File is not a PDF (extension or declared type).
    InvalidFileType,
    /// File or merge batch exceeds the size ceiling.
    FileTooLarge,
    /// File could not be parsed as a PDF.
    CorruptedDocument,
    /// A transformation step failed.
    ProcessingError,
    /// Not enough memory to complete the operation.
    MemoryError,
    /// Failure that matched no other category.
    UnknownError,
    /// Merge requested with fewer than two documents.
    InvalidInput,
}

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [ErrorKind; 7] = [
        ErrorKind::InvalidFileType,
        ErrorKind::FileTooLarge,
        ErrorKind::CorruptedDocument,
        ErrorKind::ProcessingError,
        ErrorKind::MemoryError,
        ErrorKind::UnknownError,
        ErrorKind::InvalidInput,
    ];

    /// User-facing message for this kind.
    pub fn message(&self) -> &'static str {
        self.text().0
    }

    /// Suggested remedy for this kind, if one exists.
    pub fn remedy(&self) -> Option<&'static str> {
        self.text().1
    }

    fn text(&self) -> (&'static str, Option<&'static str>) {
        match self {
            Self::InvalidFileType => (
                "Please select a valid PDF file.",
                Some("Make sure the file has a .pdf extension and is a real PDF document."),
            ),
            Self::FileTooLarge => (
                "The file is too large to process.",
                Some("Use files under 100 MB each, and under 200 MB in total when merging."),
            ),
            Self::CorruptedDocument => (
                "The PDF file appears to be corrupted or damaged.",
                Some("Open the file in a PDF reader, save a fresh copy, and try again."),
            ),
            Self::ProcessingError => (
                "An error occurred while processing the PDF.",
                Some("Try again. If it keeps failing, the document may use unsupported features."),
            ),
            Self::MemoryError => (
                "Not enough memory to process this file.",
                Some("Close other applications or try a smaller file."),
            ),
            Self::UnknownError => (
                "An unexpected error occurred.",
                Some("Try again, or reset and start over."),
            ),
            Self::InvalidInput => (
                "At least two PDF files are required to merge.",
                Some("Add more PDF files and try again."),
            ),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidFileType => "invalid file type",
            Self::FileTooLarge => "file too large",
            Self::CorruptedDocument => "corrupted document",
            Self::ProcessingError => "processing error",
            Self::MemoryError => "memory error",
            Self::UnknownError => "unknown error",
            Self::InvalidInput => "invalid input",
        };
        f.write_str(name)
    }
}

/// A failure rendered for display: kind plus its fixed message and remedy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    /// Category of the failure.
    pub kind: ErrorKind,
    /// User-facing message.
    pub message: String,
    /// Suggested remedy.
    pub remedy: Option<String>,
}

impl From<ErrorKind> for ErrorRecord {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
            remedy: kind.remedy().map(str::to_string),
        }
    }
}

/// Main error type for pdfdeck operations.
#[derive(Debug, Error)]
pub enum PdfDeckError {
    /// Filename extension or declared type is not PDF.
    #[error("Not a PDF file: {name}\n  Reason: {reason}")]
    InvalidFileType {
        /// Name of the rejected file.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// File (or merge batch) exceeds the applicable size ceiling.
    #[error("{name} is {size} bytes, over the {limit} byte limit")]
    FileTooLarge {
        /// Name of the file, or a description of the batch.
        name: String,
        /// Actual size in bytes.
        size: u64,
        /// Ceiling in bytes.
        limit: u64,
    },

    /// Accepted bytes could not be parsed as a PDF.
    #[error("Corrupted or invalid PDF: {name}\n  Details: {details}")]
    CorruptedDocument {
        /// Name of the file.
        name: String,
        /// Parser detail.
        details: String,
    },

    /// Merge was given fewer than two documents.
    #[error("Merge needs at least 2 documents, got {count}")]
    NotEnoughDocuments {
        /// Number of documents supplied.
        count: usize,
    },

    /// Input file does not exist.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Missing path.
        path: PathBuf,
    },

    /// Output file already exists and overwriting is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output directory",
        path.display()
    )]
    OutputExists {
        /// Existing output path.
        path: PathBuf,
    },

    /// Writing an output file failed.
    #[error("Failed to write output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// An untyped failure, assigned a kind by the classifier at the
    /// pipeline boundary.
    #[error("{message}")]
    Classified {
        /// Kind chosen by the classifier.
        kind: ErrorKind,
        /// Original failure message.
        message: String,
    },
}

impl PdfDeckError {
    /// Create an InvalidFileType error.
    pub fn invalid_file_type(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFileType {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileTooLarge error.
    pub fn file_too_large(name: impl Into<String>, size: u64, limit: u64) -> Self {
        Self::FileTooLarge {
            name: name.into(),
            size,
            limit,
        }
    }

    /// Create a CorruptedDocument error.
    pub fn corrupted(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::CorruptedDocument {
            name: name.into(),
            details: details.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a Classified error.
    pub fn classified(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Classified {
            kind,
            message: message.into(),
        }
    }

    /// The kind this error was created with.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFileType { .. } => ErrorKind::InvalidFileType,
            Self::FileTooLarge { .. } => ErrorKind::FileTooLarge,
            Self::CorruptedDocument { .. } => ErrorKind::CorruptedDocument,
            Self::NotEnoughDocuments { .. } => ErrorKind::InvalidInput,
            Self::FileNotFound { .. } => ErrorKind::InvalidInput,
            Self::OutputExists { .. } => ErrorKind::InvalidInput,
            Self::InvalidConfig { .. } => ErrorKind::InvalidInput,
            Self::FailedToWrite { .. } => ErrorKind::ProcessingError,
            Self::Io { .. } => ErrorKind::ProcessingError,
            Self::Cancelled => ErrorKind::UnknownError,
            Self::Classified { kind, .. } => *kind,
        }
    }

    /// Message/remedy pair for display.
    pub fn record(&self) -> ErrorRecord {
        ErrorRecord::from(self.kind())
    }

    /// Whether the failure was caused by the input rather than by processing.
    ///
    /// Retrying with identical input will fail the same way for these.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidFileType
                | ErrorKind::FileTooLarge
                | ErrorKind::CorruptedDocument
                | ErrorKind::InvalidInput
        )
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidFileType { .. } => 1,
            Self::FileTooLarge { .. } => 1,
            Self::NotEnoughDocuments { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::FileNotFound { .. } => 2,
            Self::Io { .. } => 2,
            Self::CorruptedDocument { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::FailedToWrite { .. } => 5,
            Self::Classified { .. } => 6,
            Self::Cancelled => 130, // Standard exit code for SIGINT
        }
    }
}
