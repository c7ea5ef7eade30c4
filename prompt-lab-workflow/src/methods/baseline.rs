use super::{MethodKind, PromptStrategy};

/// Sends the prompt unmodified
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineStrategy;

impl PromptStrategy for BaselineStrategy {
    fn kind(&self) -> MethodKind {
        MethodKind::Baseline
    }

    fn render(&self, prompt: &str) -> String {
        prompt.to_string()
    }
}
