//! Markdown rendering for on-screen display.

use crate::blocks::{Block, PlanDocument};

/// Render the document as Markdown. Spacers become paragraph breaks.
pub fn render_markdown(doc: &PlanDocument) -> String {
    let mut out = String::new();
    for block in doc.content() {
        match block {
            Block::Title(text) => out.push_str(&format!("# {text}\n\n")),
            Block::Heading(text) => out.push_str(&format!("## {text}\n\n")),
            Block::Paragraph(text) => out.push_str(&format!("{text}\n\n")),
            Block::BulletList(items) => {
                for item in items {
                    out.push_str(&format!("- {item}\n"));
                }
                out.push('\n');
            }
            Block::Spacer => {}
        }
    }
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out.push('\n');
    out
}
