pub mod invoker;
pub mod mock;
pub mod ollama;
pub mod transcription;
pub mod types;

pub use invoker::*;
pub use mock::*;
pub use ollama::*;
pub use transcription::*;
pub use types::*;

use thiserror::Error;

/// Failures reported by a reasoning client (text or vision).
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Inference service is not reachable at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Inference service returned error (status {status}): {body}")]
    ServiceError { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Inference service returned no content")]
    EmptyResponse,
}

/// The only failure the model invoker surfaces. Callers route it to the
/// deterministic fallback.
#[derive(Error, Debug)]
#[error("Inference unavailable: {0}")]
pub struct InferenceUnavailable(#[from] pub InferenceError);

/// Speech-to-text failures. Never fatal: diagnosis continues without a transcript.
#[derive(Error, Debug)]
pub enum TranscriptionError {
    #[error("Transcription service is not reachable at {0}")]
    Connection(String),

    #[error("Transcription timed out after {0}s")]
    Timeout(u64),

    #[error("Transcription service returned error (status {status}): {body}")]
    ServiceError { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed transcription response: {0}")]
    ResponseParsing(String),

    #[error("Audio payload rejected: {0}")]
    InvalidAudio(String),
}
