//! The business plan wizard.
//!
//! A five-step form ([`Wizard`]) gated by per-section validation
//! ([`Validator`]), a prompt builder ([`PromptTemplate`]) and the
//! orchestration boundary ([`PlanSession`]) that turns a complete form into
//! a parsed plan document.

pub mod answers;
pub mod generate;
pub mod prompt;
pub mod state;
pub mod summary;
pub mod validation;

pub use answers::{example_answers, example_fields, load_answers, save_answers, FormError};
pub use generate::{GenerateError, GeneratedPlan, PlanSession};
pub use prompt::{build_prompt, PromptTemplate, DEFAULT_TEMPLATE};
pub use state::{Completion, NavigationError, StepStatus, Wizard};
pub use summary::summary_card;
pub use validation::{
    is_acceptable_length, length_warnings, validation_message, SectionErrors, ValidationResult,
    Validator, MAX_FIELD_LENGTH, MIN_FIELD_LENGTH,
};
