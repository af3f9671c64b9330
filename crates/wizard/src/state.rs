//! The five-step wizard state machine.
//!
//! Forward moves are gated by the current section's validation; backward
//! moves are not. Field values survive navigation in both directions.

use planforge_core::{FieldKey, FieldMap, Section, SessionId};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::validation::{ValidationResult, Validator};

/// Why a navigation request was refused. The step is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("Please complete all required fields before proceeding.")]
    Incomplete {
        section: Section,
        errors: Vec<String>,
    },

    #[error("Already at the final step")]
    AtLastStep,

    #[error("Already at the first step")]
    AtFirstStep,
}

/// Where a step stands relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Done,
    Current,
    Pending,
}

/// Form-wide completion summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub complete: bool,
    pub sections_needing_attention: usize,
}

/// One user's pass through the form. Owned exclusively by its session.
#[derive(Debug, Clone)]
pub struct Wizard {
    session_id: SessionId,
    current: Section,
    fields: FieldMap,
    validator: Validator,
}

impl Wizard {
    /// A fresh wizard on step 1 with an empty form.
    pub fn new(validator: Validator) -> Self {
        Self::with_fields(validator, FieldMap::new())
    }

    /// A wizard on step 1 pre-filled with `fields`.
    pub fn with_fields(validator: Validator, fields: FieldMap) -> Self {
        let session_id = SessionId::new();
        debug!(session = %session_id, prefilled = fields.len(), "Wizard session started");
        Self {
            session_id,
            current: Section::CompanyOverview,
            fields,
            validator,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn current(&self) -> Section {
        self.current
    }

    /// 1-based step index.
    pub fn step(&self) -> u8 {
        self.current.step()
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn into_fields(self) -> FieldMap {
        self.fields
    }

    pub fn set_field(&mut self, key: FieldKey, value: impl Into<String>) {
        self.fields.set(key, value);
    }

    /// Apply a batch of edits, typically one section's worth.
    pub fn apply<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (FieldKey, V)>,
        V: Into<String>,
    {
        self.fields.merge(values);
    }

    pub fn validate_current(&self) -> ValidationResult {
        self.validator.validate_section(self.current, &self.fields)
    }

    /// Move to the next step if the current section validates.
    pub fn advance(&mut self) -> Result<Section, NavigationError> {
        let next = self.current.next().ok_or(NavigationError::AtLastStep)?;
        let result = self.validate_current();
        if !result.is_valid() {
            debug!(
                session = %self.session_id,
                section = %self.current,
                missing = result.errors().len(),
                "Advance blocked"
            );
            return Err(NavigationError::Incomplete {
                section: self.current,
                errors: result.into_errors(),
            });
        }
        debug!(session = %self.session_id, from = %self.current, to = %next, "Advanced");
        self.current = next;
        Ok(next)
    }

    /// Move to the previous step. Never validates.
    pub fn retreat(&mut self) -> Result<Section, NavigationError> {
        let previous = self.current.previous().ok_or(NavigationError::AtFirstStep)?;
        debug!(session = %self.session_id, from = %self.current, to = %previous, "Retreated");
        self.current = previous;
        Ok(previous)
    }

    /// Status of every step, in order.
    pub fn progress(&self) -> Vec<(Section, StepStatus)> {
        Section::ALL
            .iter()
            .map(|section| {
                let status = match section.step().cmp(&self.current.step()) {
                    std::cmp::Ordering::Less => StepStatus::Done,
                    std::cmp::Ordering::Equal => StepStatus::Current,
                    std::cmp::Ordering::Greater => StepStatus::Pending,
                };
                (*section, status)
            })
            .collect()
    }

    pub fn completion(&self) -> Completion {
        let errors = self.validator.validate_all(&self.fields);
        Completion {
            complete: errors.is_empty(),
            sections_needing_attention: errors.len(),
        }
    }
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new(Validator::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_company(wizard: &mut Wizard) {
        wizard.apply([
            (FieldKey::CompanyName, "Acme Fitness Co"),
            (FieldKey::BusinessDescription, "Workout app"),
            (FieldKey::Mission, "Healthy routines"),
            (FieldKey::TargetMarket, "Professionals"),
        ]);
    }

    fn fill_all(wizard: &mut Wizard) {
        fill_company(wizard);
        wizard.apply([
            (FieldKey::MarketingStrategy, "Video content"),
            (FieldKey::CompetitorOverview, "FitApp"),
            (FieldKey::CompetitiveAdvantages, "Coaching"),
            (FieldKey::ExpectedCosts, "$8k"),
            (FieldKey::FinancialStrategy, "Reinvest"),
            (FieldKey::ProjectedSales, "500 subs"),
        ]);
    }

    #[test]
    fn starts_on_step_one_with_empty_form() {
        let wizard = Wizard::default();
        assert_eq!(wizard.step(), 1);
        assert_eq!(wizard.current(), Section::CompanyOverview);
        assert!(wizard.fields().is_empty());
    }

    #[test]
    fn advance_blocked_by_invalid_section() {
        let mut wizard = Wizard::default();
        wizard.set_field(FieldKey::CompanyName, "Acme");
        let before = wizard.fields().clone();

        match wizard.advance() {
            Err(NavigationError::Incomplete { section, errors }) => {
                assert_eq!(section, Section::CompanyOverview);
                assert_eq!(errors.len(), 3);
                assert_eq!(errors[0], "Business Description is required");
            }
            other => panic!("Expected Incomplete, got: {other:?}"),
        }
        assert_eq!(wizard.step(), 1);
        assert_eq!(wizard.fields(), &before);
    }

    #[test]
    fn advance_when_valid() {
        let mut wizard = Wizard::default();
        fill_company(&mut wizard);
        assert_eq!(wizard.advance(), Ok(Section::MarketingDetails));
        assert_eq!(wizard.step(), 2);
    }

    #[test]
    fn retreat_never_validates() {
        let mut wizard = Wizard::default();
        fill_company(&mut wizard);
        wizard.advance().unwrap();
        // Marketing is still blank, retreat goes through anyway
        assert_eq!(wizard.retreat(), Ok(Section::CompanyOverview));
        assert_eq!(wizard.retreat(), Err(NavigationError::AtFirstStep));
        assert_eq!(wizard.step(), 1);
    }

    #[test]
    fn retreat_then_advance_preserves_fields() {
        let mut wizard = Wizard::default();
        fill_all(&mut wizard);
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        let fields = wizard.fields().clone();

        wizard.retreat().unwrap();
        wizard.advance().unwrap();
        assert_eq!(wizard.step(), 3);
        assert_eq!(wizard.fields(), &fields);
    }

    #[test]
    fn cannot_advance_past_generate() {
        let mut wizard = Wizard::default();
        fill_all(&mut wizard);
        for _ in 0..4 {
            wizard.advance().unwrap();
        }
        assert_eq!(wizard.current(), Section::GeneratePlan);
        assert_eq!(wizard.advance(), Err(NavigationError::AtLastStep));
        assert_eq!(wizard.step(), 5);
    }

    #[test]
    fn blank_edit_does_not_move_step() {
        let mut wizard = Wizard::default();
        fill_company(&mut wizard);
        wizard.advance().unwrap();
        wizard.set_field(FieldKey::CompanyName, "");
        assert_eq!(wizard.step(), 2);
        // Backward then forward is now blocked by the cleared field
        wizard.retreat().unwrap();
        assert!(wizard.advance().is_err());
    }

    #[test]
    fn progress_marks_done_current_pending() {
        let mut wizard = Wizard::default();
        fill_company(&mut wizard);
        wizard.advance().unwrap();
        let progress = wizard.progress();
        assert_eq!(progress.len(), 5);
        assert_eq!(progress[0], (Section::CompanyOverview, StepStatus::Done));
        assert_eq!(progress[1], (Section::MarketingDetails, StepStatus::Current));
        assert!(progress[2..].iter().all(|(_, s)| *s == StepStatus::Pending));
    }

    #[test]
    fn completion_counts_sections() {
        let mut wizard = Wizard::default();
        assert_eq!(
            wizard.completion(),
            Completion {
                complete: false,
                sections_needing_attention: 4
            }
        );
        fill_company(&mut wizard);
        assert_eq!(wizard.completion().sections_needing_attention, 3);
        fill_all(&mut wizard);
        assert!(wizard.completion().complete);
    }

    #[test]
    fn sessions_get_distinct_ids() {
        let a = Wizard::default();
        let b = Wizard::default();
        assert_ne!(a.session_id(), b.session_id());
    }
}
