//! The `ModelGateway` trait and its error type.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Why a generation call produced no text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The model could not be reached or was never loaded.
    #[error("model unavailable: {0}")]
    Unavailable(String),
    /// The model was reached but failed while generating.
    #[error("model error: {0}")]
    Runtime(String),
    /// Generation exceeded the configured time limit.
    #[error("model timed out after {0:?}")]
    Timeout(Duration),
}

/// Outcome of one generation call.
pub type GenerationResult = Result<String, ModelError>;

/// Adapter interface for a text-generation model.
///
/// Implementations must never panic on model failure; every failure is
/// reported as a [`ModelError`]. Returned text is untrusted: it may be
/// empty, malformed, or unrelated to the prompt.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Human-readable backend name (e.g. "command").
    fn name(&self) -> &str;

    /// Generate a continuation of `prompt` using at most `max_tokens` new
    /// tokens.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> GenerationResult;
}

// Compile-time assertion: ModelGateway must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn ModelGateway) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoModel;

    #[async_trait]
    impl ModelGateway for EchoModel {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str, max_tokens: u32) -> GenerationResult {
            Ok(format!("{max_tokens}:{prompt}"))
        }
    }

    #[tokio::test]
    async fn gateway_is_usable_as_trait_object() {
        let model: Box<dyn ModelGateway> = Box::new(EchoModel);
        assert_eq!(model.name(), "echo");
        assert_eq!(model.generate("hi", 7).await.unwrap(), "7:hi");
    }

    #[test]
    fn errors_render_with_context() {
        assert_eq!(
            ModelError::Unavailable("not loaded".into()).to_string(),
            "model unavailable: not loaded"
        );
        assert_eq!(
            ModelError::Timeout(Duration::from_secs(2)).to_string(),
            "model timed out after 2s"
        );
    }
}
