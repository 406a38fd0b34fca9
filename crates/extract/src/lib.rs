mod docx;
mod image;
mod pdf;
mod txt;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use redline_core::config::OcrConfig;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("unsupported file type: '{0}' (supported: pdf, docx, png, jpg, jpeg, tiff, txt)")]
    UnsupportedFormat(String),
    #[error("PDF contains no extractable text (likely a scanned document) — upload a DOCX copy or page images for OCR")]
    NoTextLayer,
    #[error("PDF is corrupted or its text layer is unreadable: {cause}")]
    CorruptedPdf { cause: String },
    #[error("text extraction failed: {0}")]
    Failed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The closed set of supported upload formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Image,
    Txt,
}

impl DocumentFormat {
    /// Dispatch on a lowercased extension (leading dot tolerated).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "png" | "jpg" | "jpeg" | "tiff" => Some(DocumentFormat::Image),
            "txt" => Some(DocumentFormat::Txt),
            _ => None,
        }
    }
}

/// Plain text recovered from one stored file. Produced once per file and
/// never mutated; empty text is a valid (if suspicious) result that
/// downstream stages must tolerate.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub source_path: PathBuf,
    pub text: String,
}

/// Converts a stored file into plain text, with format-specific strategies
/// and OCR for images. No retries here — failures propagate typed and the
/// caller decides whether to mark the owning document as failed.
#[derive(Debug, Clone)]
pub struct TextExtractor {
    ocr: OcrConfig,
}

impl TextExtractor {
    pub fn new(ocr: OcrConfig) -> Self {
        Self { ocr }
    }

    /// Extract plain text from the file at `path`, dispatching on the
    /// declared extension. Parsing and OCR run off the async runtime.
    pub async fn extract(
        &self,
        path: &Path,
        extension: &str,
    ) -> Result<ExtractedText, ExtractError> {
        // Existence is checked before format dispatch: a missing file is
        // NotFound regardless of extension.
        if tokio::fs::metadata(path).await.is_err() {
            return Err(ExtractError::NotFound(path.to_path_buf()));
        }

        let format = DocumentFormat::from_extension(extension)
            .ok_or_else(|| ExtractError::UnsupportedFormat(extension.to_string()))?;

        debug!("extracting {:?} as {:?}", path, format);

        let text = match format {
            DocumentFormat::Pdf => {
                let bytes = tokio::fs::read(path).await?;
                run_blocking(move || pdf::extract_pdf(&bytes)).await?
            }
            DocumentFormat::Docx => {
                let bytes = tokio::fs::read(path).await?;
                run_blocking(move || docx::extract_docx(&bytes)).await?
            }
            DocumentFormat::Image => {
                let path = path.to_path_buf();
                let ocr = self.ocr.clone();
                run_blocking(move || image::ocr_image(&path, &ocr)).await?
            }
            DocumentFormat::Txt => {
                let bytes = tokio::fs::read(path).await?;
                txt::extract_txt(&bytes)
            }
        };

        Ok(ExtractedText {
            source_path: path.to_path_buf(),
            text,
        })
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, ExtractError>
where
    F: FnOnce() -> Result<T, ExtractError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ExtractError::Failed(format!("task join error: {e}")))?
}
