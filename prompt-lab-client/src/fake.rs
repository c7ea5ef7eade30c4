use async_trait::async_trait;
use prompt_lab_core::{CompletionRequest, CompletionResponse};
use tracing::debug;

use crate::error::ClientResult;
use crate::LlmClient;

const SNIPPET_CHARS: usize = 80;

/// Deterministic client that echoes the start of the prompt. Never touches the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeLlmClient;

impl FakeLlmClient {
    pub fn new() -> Self {
        Self
    }

    /// The canned response text for a request
    pub fn fake_text(request: &CompletionRequest) -> String {
        let snippet: String = request
            .prompt
            .chars()
            .take(SNIPPET_CHARS)
            .collect::<String>()
            .replace('\n', " ");

        format!(
            "[DUMMY RESPONSE] I received a prompt starting with: '{}...'. \
             This is a fake answer for model '{}'.",
            snippet, request.model_name
        )
    }
}

#[async_trait]
impl LlmClient for FakeLlmClient {
    async fn complete(&self, request: &CompletionRequest) -> ClientResult<CompletionResponse> {
        let text = Self::fake_text(request);
        let tokens_input = request.prompt.split_whitespace().count() as u32;
        let tokens_output = text.split_whitespace().count() as u32;

        debug!(model = %request.model_name, tokens_input, "Fake completion");

        Ok(CompletionResponse::new(text).with_usage(Some(tokens_input), Some(tokens_output)))
    }

    fn name(&self) -> &str {
        "dummy"
    }
}
