//! Variant orchestrator: runs v1, v2 and v3 through the pipeline.
//!
//! Variants run sequentially and independently. Whatever the model does,
//! each variant ends with a complete six-field plan; only an invalid goal
//! short-circuits, and then the rejection message stands in for all three
//! plans.

use serde::Serialize;
use tracing::{info, warn};

use crate::fallback::{fallback_plan, fill_gaps};
use crate::gateway::ModelGateway;
use crate::normalize::extract;
use crate::plan::{Field, SmartPlan};
use crate::prompt::{build_prompt, reattach_primer};
use crate::sanitize::{Goal, GoalRejection, sanitize};
use crate::variant::Variant;

/// Shown when a version index is out of range.
pub const INVALID_SELECTION: &str = "Invalid selection";

/// Tunables for a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Token budget passed to every model call.
    pub max_tokens: u32,
}

impl GenerationConfig {
    pub const DEFAULT_MAX_TOKENS: u32 = 150;
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: Self::DEFAULT_MAX_TOKENS,
        }
    }
}

/// Where a variant's plan came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanSource {
    /// Every field was extracted from model output.
    Model,
    /// Some fields were extracted; the listed ones came from fallback.
    Repaired { filled: Vec<Field> },
    /// The whole plan came from fallback.
    Fallback { reason: String },
}

/// The final plan for one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantPlan {
    pub variant: Variant,
    pub plan: SmartPlan,
    pub source: PlanSource,
}

/// Result of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// The goal failed sanitization; no model call was made.
    Rejected(GoalRejection),
    /// One plan per variant, in v1/v2/v3 order.
    Plans { goal: Goal, plans: [VariantPlan; 3] },
}

impl Generation {
    /// Render the three slots shown to the user.
    pub fn rendered(&self) -> [String; 3] {
        match self {
            Self::Rejected(reason) => {
                let message = reason.to_string();
                [message.clone(), message.clone(), message]
            }
            Self::Plans { plans, .. } => [
                plans[0].plan.render(),
                plans[1].plan.render(),
                plans[2].plan.render(),
            ],
        }
    }
}

/// Run the full pipeline for a raw goal.
pub async fn generate(
    raw_goal: Option<&str>,
    model: &dyn ModelGateway,
    config: &GenerationConfig,
) -> Generation {
    let goal = match sanitize(raw_goal) {
        Ok(goal) => goal,
        Err(reason) => {
            info!(%reason, "goal rejected");
            return Generation::Rejected(reason);
        }
    };
    if goal.truncated() {
        warn!("goal truncated to fit the prompt");
    }

    let v1 = generate_variant(&goal, Variant::V1, model, config).await;
    let v2 = generate_variant(&goal, Variant::V2, model, config).await;
    let v3 = generate_variant(&goal, Variant::V3, model, config).await;

    Generation::Plans {
        goal,
        plans: [v1, v2, v3],
    }
}

/// Run the pipeline and return the three rendered plans (or the rejection
/// message three times).
pub async fn generate_variations(
    raw_goal: Option<&str>,
    model: &dyn ModelGateway,
    config: &GenerationConfig,
) -> [String; 3] {
    generate(raw_goal, model, config).await.rendered()
}

async fn generate_variant(
    goal: &Goal,
    variant: Variant,
    model: &dyn ModelGateway,
    config: &GenerationConfig,
) -> VariantPlan {
    let prompt = build_prompt(goal, variant);

    let (plan, source) = match model.generate(&prompt, config.max_tokens).await {
        Err(e) => {
            warn!(%variant, model = model.name(), error = %e, "model call failed; using fallback plan");
            (
                fallback_plan(goal.as_str(), variant),
                PlanSource::Fallback {
                    reason: e.to_string(),
                },
            )
        }
        Ok(text) => {
            let mut plan = extract(&reattach_primer(&text));
            if plan.is_skeleton() {
                warn!(%variant, "no SMART fields in model output; using fallback plan");
                (
                    fallback_plan(goal.as_str(), variant),
                    PlanSource::Fallback {
                        reason: "no SMART fields in model output".to_string(),
                    },
                )
            } else {
                let filled = fill_gaps(&mut plan, goal.as_str(), variant);
                if filled.is_empty() {
                    (plan, PlanSource::Model)
                } else {
                    warn!(%variant, filled = ?filled, "model output missing fields");
                    (plan, PlanSource::Repaired { filled })
                }
            }
        }
    };

    info!(%variant, source = ?source, "variant generated");
    VariantPlan {
        variant,
        plan,
        source,
    }
}

/// The version at `index`, or [`INVALID_SELECTION`] when out of range.
pub fn pick_version(versions: &[String], index: usize) -> &str {
    versions
        .get(index)
        .map(String::as_str)
        .unwrap_or(INVALID_SELECTION)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
