//! Section validation.
//!
//! Pure functions of the form contents: the same field map always yields
//! the same errors, in the same order.

use std::collections::BTreeMap;

use planforge_core::fields::title_case;
use planforge_core::{FieldKey, FieldMap, RequiredFieldSpec, Section};

/// Aggregate errors, keyed by section. Only sections with errors appear.
pub type SectionErrors = BTreeMap<Section, Vec<String>>;

pub const MIN_FIELD_LENGTH: usize = 10;
pub const MAX_FIELD_LENGTH: usize = 5000;

/// Outcome of validating one section. Valid iff there are no errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

/// Checks sections against a [`RequiredFieldSpec`].
#[derive(Debug, Clone, Default)]
pub struct Validator {
    required: RequiredFieldSpec,
}

impl Validator {
    pub fn new(required: RequiredFieldSpec) -> Self {
        Self { required }
    }

    pub fn required(&self) -> &RequiredFieldSpec {
        &self.required
    }

    /// One "<Field Name> is required" error per blank required field, in
    /// the table's order. Sections without an entry are always valid.
    pub fn validate_section(&self, section: Section, fields: &FieldMap) -> ValidationResult {
        let errors = self
            .required
            .fields_for(section)
            .iter()
            .filter(|key| fields.is_blank(**key))
            .map(|key| format!("{} is required", key.label()))
            .collect();
        ValidationResult { errors }
    }

    /// Errors for every section that has any. Empty means the form is
    /// complete.
    pub fn validate_all(&self, fields: &FieldMap) -> SectionErrors {
        self.required
            .sections()
            .filter_map(|section| {
                let result = self.validate_section(section, fields);
                (!result.is_valid()).then(|| (section, result.into_errors()))
            })
            .collect()
    }
}

/// Markdown listing of aggregate errors. Empty input yields `""`.
pub fn validation_message(errors: &SectionErrors) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut message = String::from("Please complete the following required fields:\n\n");
    for (section, section_errors) in errors {
        message.push_str(&format!("**{}:**\n", title_case(section.name())));
        for error in section_errors {
            message.push_str(&format!("• {error}\n"));
        }
        message.push('\n');
    }
    message
}

/// Whether `value`, trimmed, is non-empty and its length in characters
/// falls within `[min, max]`.
pub fn is_acceptable_length(value: &str, min: usize, max: usize) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }
    let len = trimmed.chars().count();
    (min..=max).contains(&len)
}

/// Advisory notes for entered values outside the default length bounds.
/// Blank fields are left to [`Validator`]; these never block progress.
pub fn length_warnings(fields: &FieldMap) -> Vec<(FieldKey, String)> {
    fields
        .iter()
        .filter(|(key, value)| {
            !fields.is_blank(*key) && !is_acceptable_length(value, MIN_FIELD_LENGTH, MAX_FIELD_LENGTH)
        })
        .map(|(key, value)| {
            let len = value.trim().chars().count();
            let note = if len < MIN_FIELD_LENGTH {
                format!("{} is quite short ({len} characters)", key.label())
            } else {
                format!(
                    "{} is longer than {MAX_FIELD_LENGTH} characters ({len})",
                    key.label()
                )
            };
            (key, note)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_fields() -> FieldMap {
        [
            (FieldKey::CompanyName, "Acme Fitness Co"),
            (FieldKey::BusinessDescription, "Personalized workout app"),
            (FieldKey::Mission, "Keep busy people healthy"),
            (FieldKey::TargetMarket, "Urban professionals"),
            (FieldKey::MarketingStrategy, "Short video content"),
            (FieldKey::CompetitorOverview, "FitApp and HealthPro"),
            (FieldKey::CompetitiveAdvantages, "Personalized coaching"),
            (FieldKey::ExpectedCosts, "$8k development"),
            (FieldKey::FinancialStrategy, "Reinvest 30% of profit"),
            (FieldKey::ProjectedSales, "500 subscriptions"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn blank_required_fields_reported_in_order() {
        let fields: FieldMap = [(FieldKey::Mission, "Help"), (FieldKey::TargetMarket, "  ")]
            .into_iter()
            .collect();
        let result = Validator::default().validate_section(Section::CompanyOverview, &fields);
        assert!(!result.is_valid());
        assert_eq!(
            result.errors(),
            &[
                "Company Name is required",
                "Business Description is required",
                "Target Market is required",
            ]
        );
    }

    #[test]
    fn optional_fields_never_reported() {
        let result =
            Validator::default().validate_section(Section::MarketingDetails, &complete_fields());
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn generate_step_has_no_own_requirements() {
        let result = Validator::default().validate_section(Section::GeneratePlan, &FieldMap::new());
        assert!(result.is_valid());
    }

    #[test]
    fn validate_all_keeps_only_failing_sections() {
        let mut fields = complete_fields();
        fields.set(FieldKey::MarketingStrategy, "");
        fields.set(FieldKey::ProjectedSales, "\n");
        let errors = Validator::default().validate_all(&fields);
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[&Section::MarketingDetails],
            vec!["Marketing Strategy is required"]
        );
        assert_eq!(
            errors[&Section::FinancialOverview],
            vec!["Projected Sales is required"]
        );
    }

    #[test]
    fn complete_form_has_no_errors() {
        assert!(Validator::default().validate_all(&complete_fields()).is_empty());
    }

    #[test]
    fn empty_form_fails_every_section() {
        let errors = Validator::default().validate_all(&FieldMap::new());
        assert_eq!(errors.len(), 4);
        let total: usize = errors.values().map(Vec::len).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn validation_is_idempotent() {
        let validator = Validator::default();
        let fields: FieldMap = [(FieldKey::CompanyName, "Acme")].into_iter().collect();
        assert_eq!(validator.validate_all(&fields), validator.validate_all(&fields));
        assert_eq!(
            validator.validate_section(Section::CompanyOverview, &fields),
            validator.validate_section(Section::CompanyOverview, &fields)
        );
    }

    #[test]
    fn custom_required_table() {
        let spec = RequiredFieldSpec::new([(
            Section::MarketingDetails,
            vec![FieldKey::MarketingChannels],
        )])
        .unwrap();
        let validator = Validator::new(spec);
        let errors = validator.validate_all(&FieldMap::new());
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[&Section::MarketingDetails],
            vec!["Marketing Channels is required"]
        );
        assert!(
            validator
                .validate_section(Section::CompanyOverview, &FieldMap::new())
                .is_valid()
        );
    }

    #[test]
    fn message_lists_sections_and_errors() {
        let mut errors = SectionErrors::new();
        errors.insert(
            Section::CompetitorInfo,
            vec!["Competitor Overview is required".to_string()],
        );
        errors.insert(
            Section::CompanyOverview,
            vec!["Company Name is required".to_string(), "Mission is required".to_string()],
        );
        assert_eq!(
            validation_message(&errors),
            "Please complete the following required fields:\n\n\
             **Company Overview:**\n• Company Name is required\n• Mission is required\n\n\
             **Competitor Info:**\n• Competitor Overview is required\n\n"
        );
    }

    #[test]
    fn message_for_no_errors_is_empty() {
        assert_eq!(validation_message(&SectionErrors::new()), "");
    }

    #[test]
    fn acceptable_length_bounds() {
        assert!(!is_acceptable_length("", 10, 5000));
        assert!(!is_acceptable_length("     ", 10, 5000));
        assert!(!is_acceptable_length("too short", 10, 5000));
        assert!(is_acceptable_length("  exactly10!  ", 10, 5000));
        assert!(is_acceptable_length(&"x".repeat(5000), 10, 5000));
        assert!(!is_acceptable_length(&"x".repeat(5001), 10, 5000));
        assert!(is_acceptable_length("éééééééééé", 10, 10));
    }

    #[test]
    fn length_warnings_skip_blank_and_ok_values() {
        let fields: FieldMap = [
            (FieldKey::CompanyName, "Acme"),
            (FieldKey::Mission, "Keep busy people healthy"),
            (FieldKey::TargetMarket, ""),
        ]
        .into_iter()
        .collect();
        let warnings = length_warnings(&fields);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].0, FieldKey::CompanyName);
        assert!(warnings[0].1.contains("quite short"));
    }
}
