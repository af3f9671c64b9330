//! `planforge validate`: Check an answers file section by section.

use std::path::PathBuf;

use planforge_core::{FieldMap, Section};
use planforge_wizard::{length_warnings, Validator};

use super::{answers_path, load_config, read_answers, validator, CmdResult};

pub async fn run(answers: Option<PathBuf>) -> CmdResult {
    let config = load_config()?;
    let path = answers_path(answers);
    let fields = read_answers(&path)?;
    let validator = validator(&config)?;

    println!("🔍 Validating {}\n", path.display());
    let (report, failing) = report(&validator, &fields);
    print!("{report}");

    if failing > 0 {
        return Err(format!("{failing} section(s) need attention").into());
    }
    Ok(())
}

/// Per-section report and the number of failing sections.
fn report(validator: &Validator, fields: &FieldMap) -> (String, usize) {
    let errors = validator.validate_all(fields);
    let mut out = String::new();

    for section in Section::ALL.iter().filter(|s| !s.is_terminal()) {
        match errors.get(section) {
            None => out.push_str(&format!("  ✅ {}\n", section.title())),
            Some(section_errors) => {
                out.push_str(&format!("  ❌ {}\n", section.title()));
                for error in section_errors {
                    out.push_str(&format!("     • {error}\n"));
                }
            }
        }
    }

    let warnings = length_warnings(fields);
    if !warnings.is_empty() {
        out.push('\n');
        for (_, note) in &warnings {
            out.push_str(&format!("  ⚠️  {note}\n"));
        }
    }

    out.push('\n');
    if errors.is_empty() {
        out.push_str("  ✅ All sections complete\n");
    } else {
        out.push_str(&format!("  ⚠️ {} sections need attention\n", errors.len()));
    }
    (out, errors.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use planforge_core::FieldKey;
    use planforge_wizard::example_fields;

    #[test]
    fn complete_answers_pass() {
        let (text, failing) = report(&Validator::default(), &example_fields());
        assert_eq!(failing, 0);
        assert!(text.contains("✅ Financial Overview"));
        assert!(text.contains("All sections complete"));
    }

    #[test]
    fn missing_fields_listed_under_section() {
        let mut fields = example_fields();
        fields.set(FieldKey::MarketingStrategy, "");
        let (text, failing) = report(&Validator::default(), &fields);
        assert_eq!(failing, 1);
        assert!(text.contains("❌ Marketing Details\n     • Marketing Strategy is required\n"));
        assert!(text.contains("1 sections need attention"));
    }

    #[test]
    fn short_values_warn_without_failing() {
        let mut fields = example_fields();
        fields.set(FieldKey::Mission, "Grow");
        let (text, failing) = report(&Validator::default(), &fields);
        assert_eq!(failing, 0);
        assert!(text.contains("⚠️  Mission is quite short (4 characters)"));
    }
}
