//! Primary reasoning path: catalog-aware prompt → external model → validated result.

pub mod types;
pub mod prompt;
pub mod parser;
pub mod validation;
pub mod ollama;
pub mod orchestrator;

pub use types::*;
pub use prompt::*;
pub use parser::*;
pub use validation::*;
pub use ollama::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("Language model is not reachable at {0}")]
    LlmConnection(String),

    #[error("Language model returned error (status {status}): {body}")]
    LlmError { status: u16, body: String },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Language model returned an empty response")]
    EmptyResponse,

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),
}
