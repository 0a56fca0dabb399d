//! A gateway with no model behind it.

use async_trait::async_trait;

use super::trait_def::{GenerationResult, ModelError, ModelGateway};

/// Reports every call as unavailable, so every plan is synthesized from
/// fallback templates. Used when no model command is configured.
#[derive(Debug, Clone, Default)]
pub struct OfflineModel;

#[async_trait]
impl ModelGateway for OfflineModel {
    fn name(&self) -> &str {
        "offline"
    }

    async fn generate(&self, _prompt: &str, _max_tokens: u32) -> GenerationResult {
        Err(ModelError::Unavailable("model not loaded".to_string()))
    }
}
