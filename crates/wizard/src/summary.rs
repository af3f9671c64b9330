use planforge_core::{FieldMap, Section};

const NOT_SPECIFIED: &str = "Not specified";

/// Markdown review of every answer, grouped by section. Shown on the
/// generate step before the plan is requested.
pub fn summary_card(fields: &FieldMap) -> String {
    let mut card = String::from("### 📋 Business Plan Summary\n");
    for section in Section::ALL.iter().filter(|s| !s.is_terminal()) {
        card.push_str(&format!("\n**{}**\n", section.title()));
        for key in section.fields() {
            let value = fields.get(*key).trim();
            let value = if value.is_empty() { NOT_SPECIFIED } else { value };
            card.push_str(&format!("- **{}:** {value}\n", key.prompt_label()));
        }
    }
    card
}

#[cfg(test)]
mod tests {
    use super::*;
    use planforge_core::FieldKey;

    #[test]
    fn lists_every_field_under_its_section() {
        let fields: FieldMap = [
            (FieldKey::CompanyName, " Acme Fitness Co "),
            (FieldKey::RevenueModel, "Subscriptions"),
        ]
        .into_iter()
        .collect();
        let card = summary_card(&fields);

        assert!(card.starts_with("### 📋 Business Plan Summary\n"));
        assert!(card.contains("\n**Company Overview**\n- **Company Name:** Acme Fitness Co\n"));
        assert!(card.contains("- **Revenue Model:** Subscriptions\n"));
        assert!(card.contains("- **Mission Statement:** Not specified\n"));
        assert!(!card.contains("Generate Plan"));
        assert_eq!(card.matches("\n- **").count(), 17);
    }
}
