//! PlanForge CLI: the main entry point.
//!
//! Commands:
//! - `onboard`: Initialize config and an example answers file
//! - `wizard`: Interactive five-step form, then generate
//! - `validate`: Check an answers file section by section
//! - `prompt`: Print the prompt an answers file produces
//! - `generate`: Generate a plan from an answers file
//! - `render`: Turn existing plan text into a PDF
//! - `status`: Show configuration status
//! - `doctor`: Diagnose setup problems

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "planforge",
    about = "PlanForge — AI business plan generator",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and an example answers file
    Onboard,

    /// Fill in the business plan form step by step
    Wizard {
        /// Pre-fill the form from an answers file
        #[arg(short, long)]
        answers: Option<PathBuf>,

        /// Where to write the PDF after generating
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Validate an answers file
    Validate {
        /// Answers file (defaults to ~/.planforge/answers.toml)
        #[arg(short, long)]
        answers: Option<PathBuf>,
    },

    /// Print the prompt built from an answers file
    Prompt {
        /// Answers file (defaults to ~/.planforge/answers.toml)
        #[arg(short, long)]
        answers: Option<PathBuf>,
    },

    /// Generate a business plan from an answers file
    Generate {
        /// Answers file (defaults to ~/.planforge/answers.toml)
        #[arg(short, long)]
        answers: Option<PathBuf>,

        /// Where to write the PDF
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Also save the raw plan text
        #[arg(long)]
        plan_out: Option<PathBuf>,
    },

    /// Assemble a PDF from existing plan text without calling the API
    Render {
        /// File containing the plan text
        #[arg(long)]
        plan: PathBuf,

        /// Company name for the title
        #[arg(short, long)]
        company: Option<String>,

        /// Where to write the PDF
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Print the parsed blocks as JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },

    /// Show configuration status
    Status,

    /// Diagnose setup problems
    Doctor,

    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (secrets redacted)
    Show,
    /// Print the config file path
    Path,
    /// Validate the configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Wizard { answers, out } => commands::wizard::run(answers, out).await?,
        Commands::Validate { answers } => commands::validate::run(answers).await?,
        Commands::Prompt { answers } => commands::prompt::run(answers).await?,
        Commands::Generate {
            answers,
            out,
            plan_out,
        } => commands::generate::run(answers, out, plan_out).await?,
        Commands::Render {
            plan,
            company,
            out,
            json,
        } => commands::render::run(plan, company, out, json).await?,
        Commands::Status => commands::status::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
        },
    }

    Ok(())
}
