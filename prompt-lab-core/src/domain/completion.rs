use serde::{Deserialize, Serialize};

/// Parameters for a single completion call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionRequest {
    pub model_name: String,
    pub prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(model_name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            prompt: prompt.into(),
            temperature: 0.0,
            max_tokens: 256,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Result of one completion call. Token counts are optional and may be approximate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionResponse {
    pub text: String,
    pub tokens_input: Option<u32>,
    pub tokens_output: Option<u32>,
}

impl CompletionResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tokens_input: None,
            tokens_output: None,
        }
    }

    pub fn with_usage(mut self, tokens_input: Option<u32>, tokens_output: Option<u32>) -> Self {
        self.tokens_input = tokens_input;
        self.tokens_output = tokens_output;
        self
    }
}

/// Generation settings shared by every request of a method run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationParams {
    pub model_name: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl GenerationParams {
    pub fn request(&self, prompt: impl Into<String>) -> CompletionRequest {
        CompletionRequest::new(self.model_name.clone(), prompt)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
    }
}
