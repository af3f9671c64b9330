//! `planforge doctor`: Diagnose setup problems.

use planforge_config::AppConfig;
use planforge_providers::build_from_config;
use planforge_wizard::PromptTemplate;

use super::CmdResult;

pub async fn run() -> CmdResult {
    println!("🩺 PlanForge Doctor — Setup Diagnostics");
    println!("======================================\n");

    let mut issues = 0;

    println!("  ✅ Binary running");

    let config_path = AppConfig::config_path();
    if !config_path.exists() {
        println!("  ⚠️  No config file — run `planforge onboard` (using defaults)");
        issues += 1;
    }

    match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");

            match build_from_config(&config) {
                Ok(client) => {
                    println!(
                        "  ✅ Generation client ready: {} / {}",
                        client.provider_name(),
                        client.model()
                    );
                    match client.health_check().await {
                        Ok(true) => println!("  ✅ Provider reachable"),
                        Ok(false) => {
                            println!("  ⚠️  Provider answered but rejected the health check");
                            issues += 1;
                        }
                        Err(e) => {
                            println!("  ⚠️  Provider unreachable: {e}");
                            issues += 1;
                        }
                    }
                }
                Err(e) => {
                    println!("  ❌ {e}");
                    issues += 1;
                }
            }

            match config.prompt_template() {
                Ok(Some(text)) => {
                    let unused = PromptTemplate::new(text).unused_fields();
                    if unused.is_empty() {
                        println!("  ✅ Custom prompt template uses every field");
                    } else {
                        let names: Vec<&str> = unused.iter().map(|k| k.as_str()).collect();
                        println!("  ⚠️  Prompt template never uses: {}", names.join(", "));
                    }
                }
                Ok(None) => println!("  ✅ Built-in prompt template"),
                Err(e) => {
                    println!("  ❌ Prompt template unreadable: {e}");
                    issues += 1;
                }
            }
        }
        Err(e) => {
            println!("  ❌ Config file invalid: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
