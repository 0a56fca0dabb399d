//! Model gateway: the call boundary to the external text-generation model.
//!
//! # Architecture
//!
//! ```text
//! orchestrator
//!     |
//!     v
//! &dyn ModelGateway --generate(prompt, max_tokens)--> Ok(text) | Err(ModelError)
//!     |
//!     +-- CommandModel   runs a local model command, prompt on stdin
//!     +-- OfflineModel   always unavailable; every plan comes from fallback
//! ```
//!
//! The gateway is built once at startup and shared read-only by every
//! request, so implementations must be `Send + Sync` and keep no
//! per-request state.

pub mod command;
pub mod offline;
pub mod trait_def;

pub use command::CommandModel;
pub use offline::OfflineModel;
pub use trait_def::{GenerationResult, ModelError, ModelGateway};
