pub mod clause;
pub mod config;
pub mod risk;
pub mod validate;

pub use clause::{ClauseKind, ClauseSet};
pub use config::Config;
pub use risk::{classify, MissingClause, RiskAssessment, Severity};
pub use validate::validate;
