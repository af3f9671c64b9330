//! The plan generation boundary consumed by the wizard.
//!
//! The wizard only ever sees [`PlanGenerationClient`]: hand it a prompt, get
//! back non-empty plan text or a terminal [`GenerationError`]. How many
//! attempts were made and which backend answered is the client's business.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Plan text returned by a successful generation. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanText(String);

impl PlanText {
    /// Wrap `text`, or `None` if it is empty or whitespace-only.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for PlanText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns a prompt into plan text.
///
/// Implementations must report an empty successful payload as
/// [`GenerationError::EmptyResponse`], never as `Ok`.
#[async_trait]
pub trait PlanGenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<PlanText, GenerationError>;
}
