//! # PlanForge Core
//!
//! Domain types, traits, and error definitions for the PlanForge business
//! plan generator. This crate has **no framework dependencies**; it defines
//! the form vocabulary and the generation boundary that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! The form vocabulary (fields and sections) is a closed set of enums, so a
//! misspelled field key is a compile error rather than a silently empty
//! answer. The generation boundary is a pair of traits:
//! - [`Provider`]: one attempt against one LLM backend
//! - [`PlanGenerationClient`]: the retried, black-box contract the wizard
//!   consumes

pub mod error;
pub mod fields;
pub mod generation;
pub mod provider;
pub mod section;

// Re-export key types at crate root for ergonomics
pub use error::{GenerationError, ProviderError};
pub use fields::{FieldKey, FieldMap, SessionId};
pub use generation::{PlanGenerationClient, PlanText};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use section::{RequiredFieldSpec, Section};
