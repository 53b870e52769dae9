//! Boundary to the external text-generation service.
//!
//! # Responsibility
//! - Define the generator contract used by the insight service.
//! - Provide the Gemini HTTP implementation.
//!
//! # Invariants
//! - Generators return either non-empty text or a `GenerationError`; they
//!   never substitute fallback text themselves.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod gemini;

pub use gemini::GeminiGenerator;

/// Failure of one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    MissingCredentials,
    Transport(String),
    Status { code: u16, body: String },
    MalformedResponse(String),
    EmptyResponse,
}

impl Display for GenerationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredentials => f.write_str("no API key configured"),
            Self::Transport(message) => write!(f, "transport error: {message}"),
            Self::Status { code, body } => write!(f, "service returned {code}: {body}"),
            Self::MalformedResponse(message) => write!(f, "malformed response: {message}"),
            Self::EmptyResponse => f.write_str("service returned no text"),
        }
    }
}

impl Error for GenerationError {}

/// Produces natural-language text for a prompt.
pub trait NarrativeGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
