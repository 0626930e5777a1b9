pub mod fallback;
pub mod inference;
pub mod interview;
pub mod orchestrator; // Caller-facing DiagnosticPipeline
pub mod parser;
pub mod prompt;
pub mod summary;
pub mod synthesis;

pub use orchestrator::{DiagnosticPipeline, SymptomDiagnoser};
