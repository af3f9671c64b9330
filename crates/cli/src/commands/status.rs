//! `planforge status`: Show configuration status.

use planforge_config::AppConfig;
use planforge_wizard::load_answers;

use super::{validator, CmdResult};

pub async fn run() -> CmdResult {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let required = config.required_fields()?;

    println!("📝 PlanForge Status");
    println!("==================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Provider:     {}", config.provider);
    println!("  Model:        {}", config.active_model());
    println!("  Temperature:  {}", config.temperature);
    println!("  Max tokens:   {}", config.max_output_tokens);
    println!(
        "  Retries:      {} attempts, {}s timeout, {}ms initial backoff",
        config.generation.max_attempts,
        config.generation.request_timeout_secs,
        config.generation.initial_backoff_ms
    );
    println!("  API key:      {}", if config.has_api_key() { "configured" } else { "missing" });
    println!("  Required:     {} fields", required.total());
    println!(
        "  Prompt:       {}",
        if config.prompt.template.is_some() || config.prompt.template_file.is_some() {
            "custom"
        } else {
            "built-in"
        }
    );
    println!(
        "  Export:       {} with {}in margins",
        config.export.page_size, config.export.margin_inches
    );

    let config_path = AppConfig::config_path();
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `planforge onboard` first");
    }

    let answers_path = AppConfig::answers_path();
    if answers_path.exists() {
        let fields = load_answers(&answers_path)?;
        let errors = validator(&config)?.validate_all(&fields);
        let company = fields.company_name().unwrap_or("Not specified");
        println!("  ✅ Saved answers for {company}");
        if errors.is_empty() {
            println!("  ✅ All sections complete");
        } else {
            println!("  ⚠️ {} sections need attention", errors.len());
        }
    } else {
        println!("  ⏳ No saved answers — run `planforge wizard`");
    }

    Ok(())
}
