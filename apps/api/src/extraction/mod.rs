//! Turns an uploaded PDF, DOCX or text document into lowercase plain text.
//!
//! Dispatch is by filename extension only. Anything that is not `.pdf` or
//! `.docx` is decoded as UTF-8 with undecodable bytes dropped, so an
//! unsupported binary format yields garbled text rather than an error.

pub mod docx;
pub mod upload;

use std::io::Write;
use std::path::Path;

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to stage upload: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("could not read DOCX: {0}")]
    Docx(String),

    #[error("extraction task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Self {
        let extension = Path::new(filename)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase());
        match extension.as_deref() {
            Some("pdf") => DocumentKind::Pdf,
            Some("docx") => DocumentKind::Docx,
            _ => DocumentKind::PlainText,
        }
    }
}

/// Extracts text on the blocking pool. Parser panics surface as `ExtractError::Task`.
pub async fn extract_text(bytes: Bytes, filename: &str) -> Result<String, ExtractError> {
    let filename = filename.to_string();
    tokio::task::spawn_blocking(move || {
        extract_text_in(&bytes, &filename, &std::env::temp_dir())
    })
    .await
    .map_err(|e| ExtractError::Task(e.to_string()))?
}

/// Stages `bytes` as a temporary file under `staging_dir` and extracts its text.
/// The temporary file is removed on every return path.
pub fn extract_text_in(
    bytes: &[u8],
    filename: &str,
    staging_dir: &Path,
) -> Result<String, ExtractError> {
    let kind = DocumentKind::from_filename(filename);
    let suffix = Path::new(filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default();

    let mut staged = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(&suffix)
        .tempfile_in(staging_dir)?;
    staged.write_all(bytes)?;
    staged.flush()?;

    let text = match kind {
        DocumentKind::Pdf => pdf_extract::extract_text(staged.path())
            .map_err(|e| ExtractError::Pdf(e.to_string()))?,
        DocumentKind::Docx => docx::extract_docx_text(staged.path())?,
        DocumentKind::PlainText => decode_lossy(&std::fs::read(staged.path())?),
    };

    debug!(
        "Extracted {} chars from {filename} ({kind:?}, {} bytes)",
        text.len(),
        bytes.len()
    );
    Ok(text.to_lowercase())
}

/// UTF-8 decode that skips invalid sequences instead of substituting U+FFFD.
fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}
