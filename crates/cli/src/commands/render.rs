//! `planforge render`: Assemble a document from existing plan text.

use std::path::PathBuf;

use planforge_document::{parse_plan, render_markdown};

use super::{exporter, load_config, pdf_path, write_pdf, CmdResult};

pub async fn run(
    plan: PathBuf,
    company: Option<String>,
    out: Option<PathBuf>,
    json: bool,
) -> CmdResult {
    let config = load_config()?;
    let text = std::fs::read_to_string(&plan)
        .map_err(|e| format!("Failed to read plan text at {}: {e}", plan.display()))?;
    let company = company.unwrap_or_default();
    let document = parse_plan(&text, &company);

    if json {
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        println!("{}", render_markdown(&document));
    }

    let path = pdf_path(&config, out, &company);
    write_pdf(&exporter(&config)?, &document, &path)?;
    eprintln!(
        "  ✅ Saved PDF ({} sections): {}",
        document.headings().len(),
        path.display()
    );
    Ok(())
}
