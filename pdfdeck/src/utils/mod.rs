//! Small helpers shared across modules.

/// Magic bytes every PDF starts with.
pub const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// How far into the buffer the signature may appear.
///
/// Some producers prepend junk before the header; readers tolerate up to
/// 1 KiB of it.
pub const SIGNATURE_SEARCH_WINDOW: usize = 1024;

/// Whether `bytes` carries a PDF header near the start.
pub fn has_pdf_signature(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(SIGNATURE_SEARCH_WINDOW)];
    window
        .windows(PDF_SIGNATURE.len())
        .any(|chunk| chunk == PDF_SIGNATURE)
}

/// Format file size in human-readable form.
///
/// # Arguments
///
/// * `size` - File size in bytes
///
/// # Returns
///
/// Formatted string like "1.50 MB" or "234 bytes"
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
