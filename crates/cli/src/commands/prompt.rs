//! `planforge prompt`: Print the prompt an answers file produces.

use std::path::PathBuf;

use planforge_wizard::validation_message;

use super::{answers_path, load_config, plan_session, read_answers, validator, CmdResult};

pub async fn run(answers: Option<PathBuf>) -> CmdResult {
    let config = load_config()?;
    let fields = read_answers(&answers_path(answers))?;
    let session = plan_session(&config)?;

    let errors = validator(&config)?.validate_all(&fields);
    if !errors.is_empty() {
        eprintln!("⚠️  The form is incomplete; blank slots are left empty.\n");
        eprintln!("{}", validation_message(&errors));
    }

    println!("{}", session.template().render(&fields));
    Ok(())
}
