//! Generation orchestration.
//!
//! This is where validation, prompt building, the generation client and the
//! document parser meet. Every failure is converted to a [`GenerateError`]
//! here; nothing escapes as a panic and the form is only ever borrowed.

use chrono::{DateTime, Utc};
use planforge_core::{FieldMap, GenerationError, PlanGenerationClient, PlanText};
use planforge_document::{export_file_name, parse_plan, PlanDocument, DEFAULT_COMPANY_NAME};
use thiserror::Error;
use tracing::{info, warn};

use crate::prompt::PromptTemplate;
use crate::validation::{SectionErrors, Validator};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{} section(s) have missing required fields", .0.len())]
    Incomplete(SectionErrors),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl GenerateError {
    /// The single message shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            GenerateError::Incomplete(_) => {
                "Please complete all required fields before generating your business plan."
            }
            GenerateError::Generation(GenerationError::MissingCredential(_)) => {
                "Please set your API key before generating your business plan."
            }
            GenerateError::Generation(_) => {
                "There was an error generating your business plan. Please try again."
            }
        }
    }

    /// What the user can do about it, if anything beyond fixing the form.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            GenerateError::Incomplete(_) => None,
            GenerateError::Generation(_) => Some("Please check your API key and try again."),
        }
    }
}

/// A successfully generated and parsed plan.
#[derive(Debug, Clone)]
pub struct GeneratedPlan {
    pub company_name: String,
    pub text: PlanText,
    pub document: PlanDocument,
    pub generated_at: DateTime<Utc>,
}

impl GeneratedPlan {
    /// Suggested file name for the PDF export.
    pub fn file_name(&self) -> String {
        export_file_name(&self.company_name)
    }
}

/// Validates, builds the prompt, calls the client and parses the result.
#[derive(Debug, Clone, Default)]
pub struct PlanSession {
    validator: Validator,
    template: PromptTemplate,
}

impl PlanSession {
    pub fn new(validator: Validator, template: PromptTemplate) -> Self {
        Self {
            validator,
            template,
        }
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// The prompt for a complete form, or the sections still missing fields.
    pub fn prompt(&self, fields: &FieldMap) -> Result<String, GenerateError> {
        let errors = self.validator.validate_all(fields);
        if !errors.is_empty() {
            return Err(GenerateError::Incomplete(errors));
        }
        Ok(self.template.render(fields))
    }

    /// Generate a plan. The client is not called unless the form is complete.
    pub async fn generate(
        &self,
        fields: &FieldMap,
        client: &dyn PlanGenerationClient,
    ) -> Result<GeneratedPlan, GenerateError> {
        let prompt = self.prompt(fields)?;
        let company_name = fields
            .company_name()
            .unwrap_or(DEFAULT_COMPANY_NAME)
            .to_string();

        info!(company = %company_name, prompt_chars = prompt.len(), "Generating business plan");
        let text = client.generate(&prompt).await.map_err(|e| {
            warn!(error = %e, "Business plan generation failed");
            GenerateError::Generation(e)
        })?;

        let document = parse_plan(text.as_str(), &company_name);
        info!(blocks = document.blocks().len(), "Business plan ready");

        Ok(GeneratedPlan {
            company_name,
            text,
            document,
            generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use planforge_core::{FieldKey, ProviderError, Section};
    use planforge_document::Block;
    use std::sync::Mutex;

    /// Records every prompt and answers with a canned result.
    struct StubClient {
        reply: Result<&'static str, GenerationError>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubClient {
        fn replying(text: &'static str) -> Self {
            Self {
                reply: Ok(text),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(error: GenerationError) -> Self {
            Self {
                reply: Err(error),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PlanGenerationClient for StubClient {
        async fn generate(&self, prompt: &str) -> Result<PlanText, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => PlanText::new(*text).ok_or(GenerationError::EmptyResponse { attempts: 1 }),
                Err(e) => Err(e.clone()),
            }
        }
    }

    fn complete_fields() -> FieldMap {
        [
            (FieldKey::CompanyName, "Acme Fitness Co"),
            (FieldKey::BusinessDescription, "Workout app"),
            (FieldKey::Mission, "Healthy routines"),
            (FieldKey::TargetMarket, "Professionals"),
            (FieldKey::MarketingStrategy, "Video content"),
            (FieldKey::CompetitorOverview, "FitApp"),
            (FieldKey::CompetitiveAdvantages, "Coaching"),
            (FieldKey::ExpectedCosts, "$8k"),
            (FieldKey::FinancialStrategy, "Reinvest"),
            (FieldKey::ProjectedSales, "500 subs"),
        ]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    async fn complete_form_produces_document() {
        let client = StubClient::replying("1. Executive Summary\n- Point A\n");
        let plan = PlanSession::default()
            .generate(&complete_fields(), &client)
            .await
            .unwrap();

        assert_eq!(
            plan.document.blocks(),
            &[
                Block::Title("Acme Fitness Co — Business Plan".into()),
                Block::Heading("1. Executive Summary".into()),
                Block::BulletList(vec!["Point A".into()]),
            ]
        );
        assert_eq!(plan.file_name(), "acme_fitness_co_business_plan.pdf");
        assert_eq!(client.calls(), 1);
        assert!(client.prompts.lock().unwrap()[0].contains("- Company Name: Acme Fitness Co"));
    }

    #[tokio::test]
    async fn incomplete_form_never_calls_client() {
        let client = StubClient::replying("plan");
        let mut fields = complete_fields();
        fields.set(FieldKey::ExpectedCosts, " ");

        let err = PlanSession::default()
            .generate(&fields, &client)
            .await
            .unwrap_err();
        match &err {
            GenerateError::Incomplete(errors) => {
                assert_eq!(
                    errors[&Section::FinancialOverview],
                    vec!["Expected Costs is required"]
                );
            }
            other => panic!("Expected Incomplete, got: {other:?}"),
        }
        assert!(err.suggestion().is_none());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn transport_failure_is_one_user_message() {
        let client = StubClient::failing(GenerationError::Transport {
            attempts: 3,
            source: ProviderError::Network("connection refused".into()),
        });
        let fields = complete_fields();
        let err = PlanSession::default()
            .generate(&fields, &client)
            .await
            .unwrap_err();

        assert_eq!(
            err.user_message(),
            "There was an error generating your business plan. Please try again."
        );
        assert_eq!(
            err.suggestion(),
            Some("Please check your API key and try again.")
        );
        assert_eq!(fields, complete_fields());
    }

    #[tokio::test]
    async fn empty_reply_is_a_generation_error() {
        let client = StubClient::replying("   ");
        let err = PlanSession::default()
            .generate(&complete_fields(), &client)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Generation(GenerationError::EmptyResponse { .. })
        ));
    }

    #[tokio::test]
    async fn custom_template_is_used() {
        let client = StubClient::replying("Plan");
        let session = PlanSession::new(
            Validator::default(),
            PromptTemplate::new("Plan for {company_name}"),
        );
        session.generate(&complete_fields(), &client).await.unwrap();
        assert_eq!(client.prompts.lock().unwrap()[0], "Plan for Acme Fitness Co");
    }

    #[test]
    fn missing_credential_message() {
        let err = GenerateError::from(GenerationError::MissingCredential("set GEMINI_API_KEY".into()));
        assert!(err.user_message().contains("API key"));
        assert!(err.suggestion().is_some());
    }
}
