//! Subcommand implementations and the helpers they share.

pub mod config_cmd;
pub mod doctor;
pub mod generate;
pub mod onboard;
pub mod prompt;
pub mod render;
pub mod status;
pub mod validate;
pub mod wizard;

use std::io::Write;
use std::path::{Path, PathBuf};

use planforge_config::AppConfig;
use planforge_core::FieldMap;
use planforge_document::{export_file_name, PageSetup, PdfExporter, PlanDocument};
use planforge_wizard::{
    load_answers, validation_message, GenerateError, PlanSession, PromptTemplate, Validator,
};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    AppConfig::load().map_err(|e| format!("Failed to load config: {e}").into())
}

pub fn validator(config: &AppConfig) -> Result<Validator, Box<dyn std::error::Error>> {
    Ok(Validator::new(config.required_fields()?))
}

/// Validator and prompt template as configured.
pub fn plan_session(config: &AppConfig) -> Result<PlanSession, Box<dyn std::error::Error>> {
    let template = config
        .prompt_template()?
        .map(PromptTemplate::new)
        .unwrap_or_default();
    Ok(PlanSession::new(validator(config)?, template))
}

pub fn answers_path(arg: Option<PathBuf>) -> PathBuf {
    arg.unwrap_or_else(AppConfig::answers_path)
}

pub fn read_answers(path: &Path) -> Result<FieldMap, Box<dyn std::error::Error>> {
    Ok(load_answers(path)?)
}

pub fn exporter(config: &AppConfig) -> Result<PdfExporter, Box<dyn std::error::Error>> {
    let (width, height) = config
        .export
        .page_dimensions_mm()
        .ok_or_else(|| format!("Unknown page size '{}'", config.export.page_size))?;
    let setup = PageSetup::new(width, height, config.export.margin_mm())?;
    Ok(PdfExporter::new(setup))
}

/// `out` if given, else the company's file name in `export.output_dir`
/// (or the working directory).
pub fn pdf_path(config: &AppConfig, out: Option<PathBuf>, company: &str) -> PathBuf {
    out.unwrap_or_else(|| {
        let name = export_file_name(company);
        match &config.export.output_dir {
            Some(dir) => PathBuf::from(dir).join(name),
            None => PathBuf::from(name),
        }
    })
}

pub fn write_pdf(
    exporter: &PdfExporter,
    document: &PlanDocument,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = exporter.render(document)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Wrote PDF");
    Ok(())
}

/// Print a generation failure the way the user should see it.
pub fn report_generate_error<W: Write>(out: &mut W, err: &GenerateError) -> std::io::Result<()> {
    writeln!(out, "  ❌ {}", err.user_message())?;
    match err {
        GenerateError::Incomplete(errors) => {
            writeln!(out)?;
            for line in validation_message(errors).lines() {
                writeln!(out, "  {line}")?;
            }
        }
        GenerateError::Generation(source) => {
            tracing::debug!(error = %source, "Generation error detail");
            writeln!(out, "     {source}")?;
        }
    }
    if let Some(hint) = err.suggestion() {
        writeln!(out, "  💡 {hint}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use planforge_core::{GenerationError, ProviderError};

    #[test]
    fn pdf_path_prefers_explicit_out() {
        let config = AppConfig::default();
        let path = pdf_path(&config, Some(PathBuf::from("x/plan.pdf")), "Acme");
        assert_eq!(path, PathBuf::from("x/plan.pdf"));
    }

    #[test]
    fn pdf_path_uses_output_dir() {
        let mut config = AppConfig::default();
        config.export.output_dir = Some("plans".into());
        assert_eq!(
            pdf_path(&config, None, "Acme Fitness Co"),
            PathBuf::from("plans").join("acme_fitness_co_business_plan.pdf")
        );
        config.export.output_dir = None;
        assert_eq!(
            pdf_path(&config, None, ""),
            PathBuf::from("business_plan.pdf")
        );
    }

    #[test]
    fn exporter_follows_export_config() {
        let mut config = AppConfig::default();
        config.export.page_size = "a4".into();
        config.export.margin_inches = 1.0;
        let setup = exporter(&config).unwrap().page_setup();
        assert_eq!(setup.width_mm, 210.0);
        assert!((setup.margin_mm - 25.4).abs() < 1e-4);
    }

    #[test]
    fn transport_error_report() {
        let err = GenerateError::Generation(GenerationError::Transport {
            attempts: 3,
            source: ProviderError::Network("refused".into()),
        });
        let mut out = Vec::new();
        report_generate_error(&mut out, &err).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("There was an error generating your business plan."));
        assert!(text.contains("Please check your API key and try again."));
    }
}
