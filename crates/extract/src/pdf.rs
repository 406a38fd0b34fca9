use crate::ExtractError;

/// Pull the text layer out of a PDF.
///
/// An empty text layer is an error here, not an empty result: a well-formed
/// PDF with no text is almost always a scan, and the caller should steer the
/// user toward a DOCX copy or OCR instead of silently analyzing nothing.
pub fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(classify_pdf_error)?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::NoTextLayer);
    }

    Ok(trimmed.to_string())
}

/// Classify on the parser's error structure, not its message text. A lopdf
/// error means the PDF container itself is unreadable (bad cross-reference
/// table, truncated objects); everything else is wrapped with the raw parser
/// message preserved.
fn classify_pdf_error(err: pdf_extract::OutputError) -> ExtractError {
    match err {
        pdf_extract::OutputError::PdfError(cause) => ExtractError::CorruptedPdf {
            cause: cause.to_string(),
        },
        other => ExtractError::Failed(other.to_string()),
    }
}
