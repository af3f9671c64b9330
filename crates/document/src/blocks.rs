//! Block model of an assembled plan.

use serde::Serialize;

/// Appended to the company name to form the document title.
pub const TITLE_SUFFIX: &str = "Business Plan";

/// Used in the title when no company name was entered.
pub const DEFAULT_COMPANY_NAME: &str = "Your Company";

/// One classified unit of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Block {
    Title(String),
    Heading(String),
    Paragraph(String),
    BulletList(Vec<String>),
    /// Vertical space where the plan text had blank lines. Not content.
    Spacer,
}

impl Block {
    pub fn is_spacer(&self) -> bool {
        matches!(self, Block::Spacer)
    }
}

/// An assembled plan: a title followed by the parsed blocks.
///
/// Built once by [`crate::parse_plan`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanDocument {
    blocks: Vec<Block>,
}

impl PlanDocument {
    pub(crate) fn with_title(company_name: &str) -> Self {
        let company = company_name.trim();
        let company = if company.is_empty() {
            DEFAULT_COMPANY_NAME
        } else {
            company
        };
        Self {
            blocks: vec![Block::Title(format!("{company} — {TITLE_SUFFIX}"))],
        }
    }

    pub(crate) fn push(&mut self, block: Block) {
        // Runs of blank lines collapse into a single spacer
        if block.is_spacer() && self.blocks.last().is_some_and(Block::is_spacer) {
            return;
        }
        self.blocks.push(block);
    }

    /// Every block, spacers included.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Blocks that carry text, in order.
    pub fn content(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| !b.is_spacer())
    }

    pub fn title(&self) -> &str {
        match self.blocks.first() {
            Some(Block::Title(title)) => title,
            _ => "",
        }
    }

    /// Heading texts in document order (table of contents).
    pub fn headings(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_uses_company_name() {
        let doc = PlanDocument::with_title("  Acme Fitness Co ");
        assert_eq!(doc.title(), "Acme Fitness Co — Business Plan");
        assert_eq!(doc.blocks().len(), 1);
    }

    #[test]
    fn blank_company_falls_back() {
        let doc = PlanDocument::with_title("");
        assert_eq!(doc.title(), "Your Company — Business Plan");
    }

    #[test]
    fn consecutive_spacers_coalesce() {
        let mut doc = PlanDocument::with_title("Acme");
        doc.push(Block::Spacer);
        doc.push(Block::Spacer);
        doc.push(Block::Paragraph("text".into()));
        doc.push(Block::Spacer);
        assert_eq!(doc.blocks().len(), 4);
        assert_eq!(doc.content().count(), 2);
    }

    #[test]
    fn serializes_with_kind_tags() {
        let mut doc = PlanDocument::with_title("Acme");
        doc.push(Block::BulletList(vec!["a".into()]));
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["blocks"][0]["kind"], "title");
        assert_eq!(json["blocks"][1]["kind"], "bullet_list");
        assert_eq!(json["blocks"][1]["text"][0], "a");
    }
}
