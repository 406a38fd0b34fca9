use std::path::Path;
use std::process::Command;

use redline_core::config::OcrConfig;

use crate::ExtractError;

/// Recognize text in an image by running tesseract over it.
///
/// One engine process per call: the process exiting is the teardown, so the
/// engine is released on success and failure alike and nothing is pooled
/// across extractions.
pub fn ocr_image(path: &Path, ocr: &OcrConfig) -> Result<String, ExtractError> {
    let output = Command::new(&ocr.binary)
        .arg(path)
        .arg("stdout")
        .args(["-l", &ocr.lang])
        .output()
        .map_err(|e| ExtractError::Failed(format!("failed to run {}: {e}", ocr.binary)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExtractError::Failed(format!(
            "OCR failed: {}",
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
