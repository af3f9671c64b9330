//! LLM Provider implementations for PlanForge.
//!
//! All backends implement the `planforge_core::Provider` trait and make a
//! single attempt per call. [`RetryingClient`] wraps one of them into the
//! `PlanGenerationClient` the wizard consumes. The router builds that client
//! from configuration.

pub mod gemini;
mod http;
pub mod openai_compat;
pub mod retry;
pub mod router;

pub use gemini::GeminiProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use retry::{RetryPolicy, RetryingClient};
pub use router::build_from_config;
