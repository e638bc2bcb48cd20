use std::sync::Arc;

use serde::Serialize;

use super::SynthesisError;

/// Sampling temperature for recommendation synthesis.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Per-call generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    /// Ask the model for a single JSON object.
    pub json_response: bool,
}

impl GenerationOptions {
    pub fn json(temperature: f32) -> Self {
        Self {
            temperature,
            json_response: true,
        }
    }

    pub fn text(temperature: f32) -> Self {
        Self {
            temperature,
            json_response: false,
        }
    }
}

/// External text-generation capability (allows mocking).
///
/// One call carries a system message and a user message and returns the
/// model's reply text.
pub trait LlmClient {
    fn generate(
        &self,
        system: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, SynthesisError>;
}

impl<T: LlmClient + ?Sized> LlmClient for Arc<T> {
    fn generate(
        &self,
        system: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, SynthesisError> {
        (**self).generate(system, prompt, options)
    }
}
