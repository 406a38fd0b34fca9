use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use redline_core::{classify, ClauseSet, Config, RiskAssessment};
use redline_extract::{ExtractError, TextExtractor};
use redline_llm::{create_provider, LlmProvider};

use crate::clauses::ClauseExtractor;
use crate::namer::ChatNamer;

/// Everything derived from one processing run, for the caller to persist.
/// The core never touches the owning document record itself.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedDocument {
    pub source_path: PathBuf,
    pub text: String,
    pub clauses: ClauseSet,
    pub issues: Vec<String>,
    pub risk: RiskAssessment,
    pub title: String,
    pub processed_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// The per-file pipeline: text extraction, clause extraction with
/// validation, severity classification, chat titling.
///
/// Holds no mutable state — multiple files may be processed concurrently on
/// one pipeline. Extraction failures are fatal to the run and propagate
/// typed; the analysis stages degrade internally instead of failing.
pub struct DocumentPipeline {
    extractor: TextExtractor,
    clauses: ClauseExtractor,
    namer: ChatNamer,
}

impl DocumentPipeline {
    pub fn from_config(config: &Config) -> Self {
        let provider = shared_provider(config);
        Self {
            extractor: TextExtractor::new(config.ocr.clone()),
            clauses: ClauseExtractor::new(provider.clone(), &config.llm),
            namer: ChatNamer::new(provider, &config.llm),
        }
    }

    /// Process one stored file. On `Err` the caller is expected to mark the
    /// owning record failed and stop; no partial analysis is returned.
    pub async fn process(
        &self,
        path: &Path,
        extension: &str,
    ) -> Result<ProcessedDocument, ExtractError> {
        let started = Instant::now();

        let extracted = self.extractor.extract(path, extension).await?;
        info!(path = %path.display(), chars = extracted.text.len(), "text extracted");

        // Clause extraction and titling both consume only the plain text and
        // degrade independently.
        let (extraction, title) = tokio::join!(
            self.clauses.extract_clauses(&extracted.text),
            self.namer.name_from(&extracted.text),
        );

        let risk = classify(&extraction.clauses);
        info!(
            missing = risk.missing.len(),
            severity = ?risk.overall,
            "document classified"
        );

        Ok(ProcessedDocument {
            source_path: extracted.source_path,
            text: extracted.text,
            clauses: extraction.clauses,
            issues: extraction.issues,
            risk,
            title,
            processed_at: Utc::now(),
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }
}

/// Build the one provider both analysis stages share. A missing or
/// misconfigured credential selects degraded mode (no provider) rather than
/// failing — the document is still displayable without analysis.
fn shared_provider(config: &Config) -> Option<Arc<dyn LlmProvider>> {
    if !config.llm.is_configured() {
        warn!("no generation credential configured; analysis stages run degraded");
        return None;
    }
    match create_provider(&config.llm, &config.ollama) {
        Ok(provider) => Some(Arc::from(provider)),
        Err(e) => {
            warn!(error = %e, "generation provider unavailable; analysis stages run degraded");
            None
        }
    }
}
