//! `planforge onboard`: First-time setup.

use planforge_config::AppConfig;
use planforge_wizard::example_answers;

use super::CmdResult;

pub async fn run() -> CmdResult {
    let config_dir = AppConfig::config_dir();
    let config_path = AppConfig::config_path();
    let example_path = config_dir.join("answers.example.toml");

    println!("📝 PlanForge — First-Time Setup");
    println!("===============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if !example_path.exists() {
        std::fs::write(&example_path, example_answers())?;
        println!("✅ Created example answers: {}", example_path.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Set GEMINI_API_KEY or add api_key to {}", config_path.display());
        println!("   2. Run: planforge wizard");
        println!(
            "   3. Or try: planforge generate --answers {}\n",
            example_path.display()
        );
    }

    println!("🎉 Setup complete! Run `planforge wizard` to start your plan.\n");

    Ok(())
}
