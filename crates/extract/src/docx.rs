use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};

use crate::ExtractError;

/// Extract raw text from a DOCX body, one line per paragraph.
///
/// An empty body is a valid document, so an empty result is returned as-is
/// rather than treated as an error.
pub fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx =
        read_docx(bytes).map_err(|e| ExtractError::Failed(format!("DOCX parse failed: {e}")))?;

    let mut paragraphs: Vec<String> = Vec::new();
    for child in docx.document.children.iter() {
        if let DocumentChild::Paragraph(para) = child {
            let text: String = para
                .children
                .iter()
                .filter_map(|pc| {
                    if let ParagraphChild::Run(run) = pc {
                        Some(
                            run.children
                                .iter()
                                .filter_map(|rc| {
                                    if let RunChild::Text(t) = rc {
                                        Some(t.text.as_str())
                                    } else {
                                        None
                                    }
                                })
                                .collect::<String>(),
                        )
                    } else {
                        None
                    }
                })
                .collect();

            if !text.is_empty() {
                paragraphs.push(text);
            }
        }
    }

    Ok(paragraphs.join("\n").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_bytes_report_parse_failure() {
        let err = extract_docx(b"definitely not a zip archive").unwrap_err();
        match err {
            ExtractError::Failed(cause) => assert!(cause.contains("DOCX parse failed")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
