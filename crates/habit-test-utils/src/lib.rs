//! Shared test doubles for habit integration tests.
//!
//! Provides model gateways with scripted behavior so the pipeline can be
//! exercised without a real model:
//! - [`ScriptedModel`] replays queued responses in order and records every
//!   call it receives.
//! - [`FailingModel`] fails every call with the same error.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use habit_core::{GenerationResult, ModelError, ModelGateway};

/// A well-formed six-line completion, as a cooperative model would return
/// after the `Habit:` primer.
pub const WELL_FORMED_COMPLETION: &str = " Walk 10,000 steps every day.
Why: Walking burns calories and is easy to keep up.
Measure: Step count from a phone or watch.
Schedule: Every morning before work.
Start date: Monday.
Success criteria: Average 10,000 steps for 30 days.";

/// One call received by a [`ScriptedModel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub prompt: String,
    pub max_tokens: u32,
}

/// Gateway replaying queued responses, one per call.
///
/// Once the queue is exhausted every further call fails with
/// [`ModelError::Unavailable`].
#[derive(Debug, Default)]
pub struct ScriptedModel {
    responses: Mutex<VecDeque<GenerationResult>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedModel {
    pub fn new(responses: impl IntoIterator<Item = GenerationResult>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A model answering every call of a run with the same text.
    pub fn repeating(text: &str, times: usize) -> Self {
        Self::new(std::iter::repeat_n(Ok(text.to_string()), times))
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The prompts received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.prompt).collect()
    }

    /// Responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelGateway for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> GenerationResult {
        self.calls.lock().unwrap().push(RecordedCall {
            prompt: prompt.to_string(),
            max_tokens,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::Unavailable("script exhausted".to_string())))
    }
}

/// Gateway failing every call with a fixed error.
#[derive(Debug, Clone)]
pub struct FailingModel {
    error: ModelError,
}

impl FailingModel {
    pub fn new(error: ModelError) -> Self {
        Self { error }
    }

    /// Fails like a model that was never loaded.
    pub fn unavailable() -> Self {
        Self::new(ModelError::Unavailable("model not loaded".to_string()))
    }
}

#[async_trait]
impl ModelGateway for FailingModel {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _prompt: &str, _max_tokens: u32) -> GenerationResult {
        Err(self.error.clone())
    }
}
