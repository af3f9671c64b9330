//! `planforge wizard`: Interactive five-step form.
//!
//! Each data-entry step asks its questions (Enter keeps the current answer,
//! `-` clears it) and then offers navigation. The last step shows the
//! summary and can generate the plan.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use planforge_core::{GenerationError, PlanGenerationClient, Section};
use planforge_document::render_markdown;
use planforge_providers::build_from_config;
use planforge_wizard::{
    save_answers, summary_card, validation_message, GenerateError, GeneratedPlan,
    NavigationError, PlanSession, SectionErrors, StepStatus, Wizard,
};

use super::{
    answers_path, exporter, load_config, pdf_path, plan_session, read_answers,
    report_generate_error, validator, write_pdf, CmdResult,
};

/// Answer that clears the current value of a field.
const CLEAR_ANSWER: &str = "-";

/// How an interactive session ended.
pub enum Outcome {
    Generated(Box<GeneratedPlan>),
    Quit,
}

pub async fn run(answers: Option<PathBuf>, out: Option<PathBuf>) -> CmdResult {
    let config = load_config()?;
    let session = plan_session(&config)?;
    let fields = match &answers {
        Some(path) => read_answers(path)?,
        None => Default::default(),
    };
    let save_path = answers_path(answers);
    let mut wizard = Wizard::with_fields(validator(&config)?, fields);
    let client = build_from_config(&config)
        .map(|c| Box::new(c) as Box<dyn PlanGenerationClient>);

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║      PlanForge — Business Plan Wizard        ║");
    println!("  ╚══════════════════════════════════════════════╝");

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    let outcome = drive(
        &mut wizard,
        &session,
        &client,
        &save_path,
        &mut input,
        &mut output,
    )
    .await?;

    match outcome {
        Outcome::Generated(plan) => {
            println!("\n{}", render_markdown(&plan.document));
            let path = pdf_path(&config, out, &plan.company_name);
            write_pdf(&exporter(&config)?, &plan.document, &path)?;
            println!("  ✅ Saved PDF: {}", path.display());
            save_answers(&save_path, wizard.fields())?;
        }
        Outcome::Quit => println!("\n  👋 Bye!"),
    }
    Ok(())
}

/// Run the wizard over `input`/`output` until the user generates a plan,
/// quits, or input ends.
pub async fn drive<R: BufRead, W: Write>(
    wizard: &mut Wizard,
    session: &PlanSession,
    client: &Result<Box<dyn PlanGenerationClient>, GenerationError>,
    save_path: &Path,
    input: &mut R,
    output: &mut W,
) -> Result<Outcome, Box<dyn std::error::Error>> {
    loop {
        let section = wizard.current();
        print_header(wizard, output)?;

        if section.is_terminal() {
            writeln!(output, "\n{}", summary_card(wizard.fields()))?;
            let completion = wizard.completion();
            if completion.complete {
                writeln!(output, "  ✅ All sections complete")?;
            } else {
                writeln!(
                    output,
                    "  ⚠️ {} sections need attention",
                    completion.sections_needing_attention
                )?;
            }

            loop {
                let Some(choice) = ask(input, output, "\n  [g]enerate  [p]revious  [s]ave  [q]uit > ")?
                else {
                    return Ok(Outcome::Quit);
                };
                match choice.as_str() {
                    "g" => {
                        writeln!(output, "\n  🤖 Generating your business plan...")?;
                        let result = match client {
                            Ok(client) => session.generate(wizard.fields(), client.as_ref()).await,
                            Err(e) => Err(GenerateError::from(e.clone())),
                        };
                        match result {
                            Ok(plan) => {
                                writeln!(output, "  ✅ Business plan generated successfully!")?;
                                return Ok(Outcome::Generated(Box::new(plan)));
                            }
                            Err(e) => report_generate_error(output, &e)?,
                        }
                    }
                    "p" => {
                        wizard.retreat()?;
                        break;
                    }
                    "s" => save(wizard, save_path, output)?,
                    "q" => return Ok(Outcome::Quit),
                    other => writeln!(output, "  Unknown choice '{other}'")?,
                }
            }
            continue;
        }

        if !ask_fields(wizard, section, input, output)? {
            return Ok(Outcome::Quit);
        }

        loop {
            let Some(choice) = ask(
                input,
                output,
                "\n  [n]ext  [p]revious  [e]dit  [s]ave  [q]uit > ",
            )?
            else {
                return Ok(Outcome::Quit);
            };
            match choice.as_str() {
                "n" => match wizard.advance() {
                    Ok(_) => break,
                    Err(NavigationError::Incomplete { section, errors }) => {
                        writeln!(output, "  ❌ Please complete all required fields before proceeding.\n")?;
                        let errors: SectionErrors = [(section, errors)].into_iter().collect();
                        write!(output, "{}", validation_message(&errors))?;
                    }
                    Err(e) => writeln!(output, "  {e}")?,
                },
                "p" => match wizard.retreat() {
                    Ok(_) => break,
                    Err(e) => writeln!(output, "  {e}")?,
                },
                "e" => break,
                "s" => save(wizard, save_path, output)?,
                "q" => return Ok(Outcome::Quit),
                other => writeln!(output, "  Unknown choice '{other}'")?,
            }
        }
    }
}

fn print_header<W: Write>(wizard: &Wizard, output: &mut W) -> std::io::Result<()> {
    let section = wizard.current();
    writeln!(output)?;
    let progress: Vec<String> = wizard
        .progress()
        .into_iter()
        .map(|(s, status)| {
            let icon = match status {
                StepStatus::Done => "✅",
                StepStatus::Current => "🔄",
                StepStatus::Pending => "⏳",
            };
            format!("{icon} {}", s.title())
        })
        .collect();
    writeln!(output, "  {}", progress.join("  "))?;
    writeln!(
        output,
        "\n  ── Step {}/{}: {} ──",
        section.step(),
        Section::LAST_STEP,
        section.title()
    )?;
    writeln!(output, "  {}", section.intro())
}

/// Ask every field of `section`. Returns `false` if input ended.
fn ask_fields<R: BufRead, W: Write>(
    wizard: &mut Wizard,
    section: Section,
    input: &mut R,
    output: &mut W,
) -> std::io::Result<bool> {
    for key in section.fields() {
        let marker = if wizard.validator().required().is_required(*key) {
            " *"
        } else {
            ""
        };
        writeln!(output, "\n  {}{marker}", key.prompt_label())?;
        writeln!(output, "  ({})", key.hint())?;
        let current = wizard.fields().get(*key).trim();
        let prompt = if current.is_empty() {
            "  > ".to_string()
        } else {
            format!("  [{current}] ('{CLEAR_ANSWER}' clears) > ")
        };
        let Some(answer) = ask(input, output, &prompt)? else {
            return Ok(false);
        };
        if answer == CLEAR_ANSWER {
            wizard.set_field(*key, "");
        } else if !answer.is_empty() {
            wizard.set_field(*key, answer);
        }
    }
    Ok(true)
}

/// Print `prompt` and read one trimmed line. `None` at end of input.
fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> std::io::Result<Option<String>> {
    write!(output, "{prompt}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn save<W: Write>(
    wizard: &Wizard,
    path: &Path,
    output: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    save_answers(path, wizard.fields())?;
    writeln!(output, "  💾 Saved answers to {}", path.display())?;
    Ok(())
}
