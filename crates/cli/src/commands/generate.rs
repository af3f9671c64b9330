//! `planforge generate`: Generate a plan from an answers file.

use std::path::PathBuf;

use planforge_document::render_markdown;
use planforge_providers::build_from_config;
use planforge_wizard::GenerateError;

use super::{
    answers_path, exporter, load_config, pdf_path, plan_session, read_answers,
    report_generate_error, write_pdf, CmdResult,
};

pub async fn run(
    answers: Option<PathBuf>,
    out: Option<PathBuf>,
    plan_out: Option<PathBuf>,
) -> CmdResult {
    let config = load_config()?;
    let fields = read_answers(&answers_path(answers))?;
    let session = plan_session(&config)?;
    let exporter = exporter(&config)?;

    let result = match build_from_config(&config) {
        Ok(client) => {
            eprintln!(
                "  🤖 Generating your business plan with {} ({})...",
                client.provider_name(),
                client.model()
            );
            session.generate(&fields, &client).await
        }
        Err(e) => Err(GenerateError::from(e)),
    };

    let plan = match result {
        Ok(plan) => plan,
        Err(e) => {
            report_generate_error(&mut std::io::stderr(), &e)?;
            return Err(e.into());
        }
    };

    println!("{}", render_markdown(&plan.document));

    if let Some(path) = plan_out {
        std::fs::write(&path, plan.text.as_str())?;
        eprintln!("  ✅ Saved plan text: {}", path.display());
    }

    let path = pdf_path(&config, out, &plan.company_name);
    write_pdf(&exporter, &plan.document, &path)?;
    eprintln!("  ✅ Saved PDF: {}", path.display());

    Ok(())
}
