//! Answers files: a saved field map, as TOML (default) or JSON.
//!
//! ```toml
//! company_name = "Acme Fitness Co"
//! mission = "Empower busy professionals"
//! ```

use std::path::{Path, PathBuf};

use planforge_core::{FieldKey, FieldMap, Section};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Failed to read answers file at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse answers file at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Failed to write answers file at {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Load a field map. Unknown keys are rejected.
pub fn load_answers(path: &Path) -> Result<FieldMap, FormError> {
    let content = std::fs::read_to_string(path).map_err(|e| FormError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let parse_error = |reason: String| FormError::Parse {
        path: path.to_path_buf(),
        reason,
    };
    let fields: FieldMap = if is_json(path) {
        serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?
    } else {
        toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?
    };

    debug!(path = %path.display(), fields = fields.len(), "Loaded answers");
    Ok(fields)
}

/// Write a field map, creating parent directories as needed.
pub fn save_answers(path: &Path, fields: &FieldMap) -> Result<(), FormError> {
    let write_error = |reason: String| FormError::Write {
        path: path.to_path_buf(),
        reason,
    };
    let content = if is_json(path) {
        serde_json::to_string_pretty(fields).map_err(|e| write_error(e.to_string()))?
    } else {
        toml::to_string_pretty(fields).map_err(|e| write_error(e.to_string()))?
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
    }
    std::fs::write(path, content).map_err(|e| write_error(e.to_string()))?;

    debug!(path = %path.display(), fields = fields.len(), "Saved answers");
    Ok(())
}

/// A filled-in answers file, one commented block per section.
pub fn example_answers() -> String {
    let mut out = String::from("# PlanForge answers file\n");
    for section in Section::ALL.iter().filter(|s| !s.is_terminal()) {
        out.push_str(&format!("\n# {}\n", section.title()));
        for key in section.fields() {
            out.push_str(&format!("{} = {}\n", key, quote(key.example())));
        }
    }
    out
}

fn quote(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

/// Fields the example file fills in, for callers that want the map itself.
pub fn example_fields() -> FieldMap {
    FieldKey::ALL.iter().map(|key| (*key, key.example())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("answers.toml");
        let fields: FieldMap = [
            (FieldKey::CompanyName, "Acme \"Fitness\" Co"),
            (FieldKey::Mission, "Line one\nLine two"),
        ]
        .into_iter()
        .collect();

        save_answers(&path, &fields).unwrap();
        assert_eq!(load_answers(&path).unwrap(), fields);
    }

    #[test]
    fn json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        std::fs::write(&path, r#"{"company_name": "Acme", "target_market": "Gyms"}"#).unwrap();
        let fields = load_answers(&path).unwrap();
        assert_eq!(fields.get(FieldKey::TargetMarket), "Gyms");
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn unknown_key_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.toml");
        std::fs::write(&path, "company_name = \"Acme\"\nfavourite_colour = \"blue\"\n").unwrap();
        let err = load_answers(&path).unwrap_err();
        assert!(matches!(err, FormError::Parse { .. }));
        assert!(err.to_string().contains("favourite_colour"));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_answers(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, FormError::Read { .. }));
    }

    #[test]
    fn example_file_parses_and_is_complete() {
        let parsed: FieldMap = toml::from_str(&example_answers()).unwrap();
        assert_eq!(parsed, example_fields());
        assert_eq!(parsed.len(), 17);
        assert!(example_answers().contains("\n# Competitor Information\n"));
    }
}
