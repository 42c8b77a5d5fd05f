//! Mapping arbitrary failures onto [`ErrorKind`].
//!
//! Typed errors pass through untouched. Anything else is sorted by keyword
//! heuristics over its top-level message, checked in a fixed order so a
//! message matching several rules always lands in the same bucket.

use crate::error::{ErrorKind, PdfDeckError};

/// Ordered keyword rules. First match wins.
const RULES: &[(&[&str], ErrorKind)] = &[
    (&["invalid", "format"], ErrorKind::InvalidFileType),
    (&["large", "size"], ErrorKind::FileTooLarge),
    (&["corrupt", "damaged"], ErrorKind::CorruptedDocument),
    (&["memory"], ErrorKind::MemoryError),
    (&["processing", "parse"], ErrorKind::ProcessingError),
];

/// Turn any failure into a [`PdfDeckError`].
///
/// If `err` wraps a `PdfDeckError` (directly or under added context) that
/// error is returned as-is. Otherwise the top-level message is classified
/// with [`kind_for_message`].
pub fn classify(err: anyhow::Error) -> PdfDeckError {
    match err.downcast::<PdfDeckError>() {
        Ok(typed) => typed,
        Err(err) => {
            let message = err.to_string();
            let kind = kind_for_message(&message);
            tracing::debug!(%kind, %message, "classified untyped failure");
            PdfDeckError::classified(kind, message)
        }
    }
}

/// Pick a kind for a free-form failure message.
pub fn kind_for_message(message: &str) -> ErrorKind {
    let lowered = message.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, kind)| *kind)
        .unwrap_or(ErrorKind::UnknownError)
}
