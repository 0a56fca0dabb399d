//! Core pipeline for turning a free-form goal into SMART habit plans.
//!
//! ```text
//! raw goal --sanitize--> Goal
//!     |
//!     +--> for v1, v2, v3:
//!            build_prompt --> ModelGateway::generate --> extract
//!                 |                    |                    |
//!                 |               (ModelError)        (empty fields)
//!                 |                    v                    v
//!                 +-------------> fallback_plan / fill_gaps
//!     |
//!     v
//! [rendered v1, rendered v2, rendered v3]
//! ```

pub mod export;
pub mod fallback;
pub mod gateway;
pub mod normalize;
pub mod orchestrator;
pub mod plan;
pub mod prompt;
pub mod sanitize;
pub mod variant;

pub use export::{DocumentRenderer, ExportError, PdfRenderer, export_pdf, render_document};
pub use fallback::{fallback_field, fallback_plan, fill_gaps};
pub use gateway::{CommandModel, GenerationResult, ModelError, ModelGateway, OfflineModel};
pub use normalize::extract;
pub use orchestrator::{
    Generation, GenerationConfig, PlanSource, VariantPlan, generate, generate_variations,
    pick_version,
};
pub use plan::{Field, SmartPlan};
pub use prompt::{build_prompt, reattach_primer};
pub use sanitize::{Goal, GoalRejection, sanitize};
pub use variant::{Variant, VariantProfile};
