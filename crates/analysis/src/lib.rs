pub mod clauses;
pub mod namer;
pub mod pipeline;

pub use clauses::{ClauseExtraction, ClauseExtractor};
pub use namer::ChatNamer;
pub use pipeline::{DocumentPipeline, ProcessedDocument};
