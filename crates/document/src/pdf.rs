//! PDF export.
//!
//! Layout runs first as a pure pass that places every line on a page; the
//! placed lines are then written out with printpdf using the built-in
//! Helvetica faces, so no font files are needed at runtime.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use thiserror::Error;
use tracing::debug;

use crate::blocks::{Block, PlanDocument};

const PT_TO_MM: f32 = 25.4 / 72.0;
/// Average Helvetica advance width as a fraction of the font size.
const AVG_CHAR_EM: f32 = 0.5;
const MIN_CONTENT_MM: f32 = 20.0;
const BULLET_MARKER: &str = "•";
const BULLET_INDENT_MM: f32 = 4.0;
const BULLET_TEXT_INDENT_MM: f32 = 8.0;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid page setup: {0}")]
    InvalidPageSetup(String),

    #[error("PDF backend error: {0}")]
    Backend(String),
}

/// Page size and uniform margin, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
}

impl PageSetup {
    pub fn new(width_mm: f32, height_mm: f32, margin_mm: f32) -> Result<Self, RenderError> {
        let setup = Self {
            width_mm,
            height_mm,
            margin_mm,
        };
        setup.check()?;
        Ok(setup)
    }

    fn check(&self) -> Result<(), RenderError> {
        let values = [self.width_mm, self.height_mm, self.margin_mm];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(RenderError::InvalidPageSetup(format!("{self:?}")));
        }
        if self.content_width() < MIN_CONTENT_MM || self.content_height() < MIN_CONTENT_MM {
            return Err(RenderError::InvalidPageSetup(format!(
                "margins of {}mm leave no room on a {}x{}mm page",
                self.margin_mm, self.width_mm, self.height_mm
            )));
        }
        Ok(())
    }

    fn content_width(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }

    fn content_height(&self) -> f32 {
        self.height_mm - 2.0 * self.margin_mm
    }
}

impl Default for PageSetup {
    /// US Letter with 0.8in margins.
    fn default() -> Self {
        Self {
            width_mm: 215.9,
            height_mm: 279.4,
            margin_mm: 20.32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy)]
struct Style {
    size_pt: f32,
    leading_pt: f32,
    face: Face,
    space_after_pt: f32,
}

const TITLE: Style = Style {
    size_pt: 18.0,
    leading_pt: 22.0,
    face: Face::Bold,
    space_after_pt: 26.4,
};
const HEADING: Style = Style {
    size_pt: 14.0,
    leading_pt: 17.0,
    face: Face::Bold,
    space_after_pt: 4.0,
};
const BODY: Style = Style {
    size_pt: 10.0,
    leading_pt: 12.0,
    face: Face::Regular,
    space_after_pt: 6.0,
};
const SPACER_PT: f32 = 6.0;

/// One line of text at a fixed position. `y_mm` is the baseline, measured
/// from the bottom edge as PDF coordinates are.
#[derive(Debug, Clone, PartialEq)]
struct PlacedLine {
    text: String,
    size_pt: f32,
    face: Face,
    x_mm: f32,
    y_mm: f32,
}

fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * AVG_CHAR_EM * PT_TO_MM
}

/// Greedy word wrap. Words wider than a whole line are split.
fn wrap(text: &str, max_width_mm: f32, size_pt: f32) -> Vec<String> {
    let per_char = size_pt * AVG_CHAR_EM * PT_TO_MM;
    let max_chars = ((max_width_mm / per_char).floor() as usize).max(1);

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let needed = if current_len == 0 {
            word.len()
        } else {
            current_len + 1 + word.len()
        };
        if needed > max_chars && current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// Characters the built-in faces can show: printable ASCII, Latin-1 and the
/// WinAnsi extras in 0x80..0x9F. Everything else becomes `?`.
fn is_win_ansi(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{a0}'..='\u{ff}')
        || matches!(
            c,
            '€' | '‚' | 'ƒ' | '„' | '…' | '†' | '‡' | 'ˆ' | '‰' | 'Š' | '‹' | 'Œ' | 'Ž' | '‘'
                | '’' | '“' | '”' | '•' | '–' | '—' | '˜' | '™' | 'š' | '›' | 'œ' | 'ž'
                | 'Ÿ'
        )
}

/// printpdf encodes built-in font text as WinAnsi; keep what it can encode.
fn to_win_ansi(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' => ' ',
            c if is_win_ansi(c) => c,
            _ => '?',
        })
        .collect()
}

struct Layout {
    setup: PageSetup,
    pages: Vec<Vec<PlacedLine>>,
    /// Distance from the top edge to the next free line.
    cursor_mm: f32,
}

impl Layout {
    fn new(setup: PageSetup) -> Self {
        Self {
            setup,
            pages: vec![Vec::new()],
            cursor_mm: setup.margin_mm,
        }
    }

    fn page_is_empty(&self) -> bool {
        self.pages.last().is_none_or(Vec::is_empty)
    }

    fn place(&mut self, text: String, style: Style, x_mm: f32) {
        let height = style.leading_pt * PT_TO_MM;
        let bottom = self.setup.height_mm - self.setup.margin_mm;
        if self.cursor_mm + height > bottom && !self.page_is_empty() {
            self.pages.push(Vec::new());
            self.cursor_mm = self.setup.margin_mm;
        }
        let y_mm = self.setup.height_mm - self.cursor_mm - style.size_pt * PT_TO_MM;
        if let Some(page) = self.pages.last_mut() {
            page.push(PlacedLine {
                text,
                size_pt: style.size_pt,
                face: style.face,
                x_mm,
                y_mm,
            });
        }
        self.cursor_mm += height;
    }

    fn space(&mut self, pt: f32) {
        if !self.page_is_empty() {
            self.cursor_mm += pt * PT_TO_MM;
        }
    }

    fn text_block(&mut self, text: &str, style: Style, indent_mm: f32) {
        let width = self.setup.content_width() - indent_mm;
        for line in wrap(&to_win_ansi(text), width, style.size_pt) {
            self.place(line, style, self.setup.margin_mm + indent_mm);
        }
    }

    fn title(&mut self, text: &str) {
        let width = self.setup.content_width();
        for line in wrap(&to_win_ansi(text), width, TITLE.size_pt) {
            let x = self.setup.margin_mm + (width - text_width_mm(&line, TITLE.size_pt)) / 2.0;
            self.place(line, TITLE, x.max(self.setup.margin_mm));
        }
        self.space(TITLE.space_after_pt);
    }

    fn bullets(&mut self, items: &[String]) {
        let marker_x = self.setup.margin_mm + BULLET_INDENT_MM;
        let text_width = self.setup.content_width() - BULLET_TEXT_INDENT_MM;
        for item in items {
            let lines = wrap(&to_win_ansi(item), text_width, BODY.size_pt);
            for (i, line) in lines.into_iter().enumerate() {
                if i == 0 {
                    self.place(BULLET_MARKER.to_string(), BODY, marker_x);
                    // Marker and first line share a baseline
                    self.cursor_mm -= BODY.leading_pt * PT_TO_MM;
                }
                self.place(line, BODY, self.setup.margin_mm + BULLET_TEXT_INDENT_MM);
            }
        }
        self.space(BODY.space_after_pt);
    }

    fn finish(self) -> Vec<Vec<PlacedLine>> {
        self.pages
    }
}

fn layout(doc: &PlanDocument, setup: PageSetup) -> Vec<Vec<PlacedLine>> {
    let mut layout = Layout::new(setup);
    for block in doc.blocks() {
        match block {
            Block::Title(text) => layout.title(text),
            Block::Heading(text) => {
                layout.text_block(text, HEADING, 0.0);
                layout.space(HEADING.space_after_pt);
            }
            Block::Paragraph(text) => layout.text_block(text, BODY, 0.0),
            Block::BulletList(items) => layout.bullets(items),
            Block::Spacer => layout.space(SPACER_PT),
        }
    }
    layout.finish()
}

/// Renders a [`PlanDocument`] to PDF bytes.
#[derive(Debug, Clone, Default)]
pub struct PdfExporter {
    setup: PageSetup,
}

impl PdfExporter {
    pub fn new(setup: PageSetup) -> Self {
        Self { setup }
    }

    pub fn page_setup(&self) -> PageSetup {
        self.setup
    }

    pub fn render(&self, doc: &PlanDocument) -> Result<Vec<u8>, RenderError> {
        self.setup.check()?;
        let pages = layout(doc, self.setup);
        let width = Mm(self.setup.width_mm);
        let height = Mm(self.setup.height_mm);

        let (pdf, first_page, first_layer) =
            PdfDocument::new(to_win_ansi(doc.title()), width, height, "Layer 1");
        let regular = pdf
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(backend)?;
        let bold = pdf
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(backend)?;
        for (index, lines) in pages.iter().enumerate() {
            let (page, layer) = if index == 0 {
                (first_page, first_layer)
            } else {
                pdf.add_page(width, height, "Layer 1")
            };
            let layer = pdf.get_page(page).get_layer(layer);
            for line in lines {
                let font: &IndirectFontRef = match line.face {
                    Face::Regular => &regular,
                    Face::Bold => &bold,
                };
                layer.use_text(
                    line.text.as_str(),
                    line.size_pt,
                    Mm(line.x_mm),
                    Mm(line.y_mm),
                    font,
                );
            }
        }

        let bytes = pdf.save_to_bytes().map_err(backend)?;
        debug!(pages = pages.len(), bytes = bytes.len(), "Rendered plan PDF");
        Ok(bytes)
    }
}

fn backend(e: impl std::fmt::Debug) -> RenderError {
    RenderError::Backend(format!("{e:?}"))
}

/// File name offered for the exported plan, e.g. `acme_co_business_plan.pdf`.
pub fn export_file_name(company_name: &str) -> String {
    let mut slug = String::new();
    for c in company_name.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_');
    if slug.is_empty() {
        "business_plan.pdf".to_string()
    } else {
        format!("{slug}_business_plan.pdf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_plan;

    fn all_text(pages: &[Vec<PlacedLine>]) -> Vec<&str> {
        pages
            .iter()
            .flatten()
            .map(|l| l.text.as_str())
            .collect()
    }

    #[test]
    fn default_is_letter_with_point_eight_inch_margins() {
        let setup = PageSetup::default();
        assert_eq!(setup.width_mm, 215.9);
        assert_eq!(setup.height_mm, 279.4);
        assert!((setup.margin_mm - 0.8 * 25.4).abs() < 1e-4);
    }

    #[test]
    fn rejects_margins_that_swallow_the_page() {
        assert!(matches!(
            PageSetup::new(100.0, 100.0, 45.0),
            Err(RenderError::InvalidPageSetup(_))
        ));
        assert!(PageSetup::new(210.0, 297.0, 20.0).is_ok());
    }

    #[test]
    fn wrap_is_greedy_and_keeps_words() {
        // 10pt: each char is ~1.76mm, so 18mm holds 10 chars
        let lines = wrap("aaa bbb ccc ddd", 18.0, 10.0);
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn wrap_splits_oversized_words() {
        let lines = wrap("abcdefghijklmnop", 8.9, 10.0);
        assert_eq!(lines, vec!["abcde", "fghij", "klmno", "p"]);
    }

    #[test]
    fn wrap_of_blank_text_is_empty() {
        assert!(wrap("   ", 100.0, 10.0).is_empty());
    }

    #[test]
    fn win_ansi_text_passes_through() {
        assert_eq!(
            to_win_ansi("Acme — “Best” ‘plan’… • 50% – €5 ™"),
            "Acme — “Best” ‘plan’… • 50% – €5 ™"
        );
        assert_eq!(to_win_ansi("Café Zürich £10k ½"), "Café Zürich £10k ½");
        assert_eq!(to_win_ansi("東京 → ok"), "?? ? ok");
    }

    #[test]
    fn latin_text_survives_layout() {
        let doc = parse_plan("Budget: €50k for Café Zürich, £10k reserve", "Crème Brûlée Co");
        let pages = layout(&doc, PageSetup::default());
        assert_eq!(
            all_text(&pages),
            vec![
                "Crème Brûlée Co — Business Plan",
                "Budget: €50k for Café Zürich, £10k reserve"
            ]
        );
    }

    #[test]
    fn layout_preserves_order_and_marks_bullets() {
        let doc = parse_plan("1. Summary\n- first\n- second\nClosing words.", "Acme");
        let pages = layout(&doc, PageSetup::default());
        assert_eq!(pages.len(), 1);
        assert_eq!(
            all_text(&pages),
            vec![
                "Acme — Business Plan",
                "1. Summary",
                "•",
                "first",
                "•",
                "second",
                "Closing words."
            ]
        );
    }

    #[test]
    fn bullet_marker_shares_baseline_with_text() {
        let doc = parse_plan("- only", "Acme");
        let pages = layout(&doc, PageSetup::default());
        let lines = &pages[0];
        let marker = &lines[1];
        let text = &lines[2];
        assert_eq!(marker.y_mm, text.y_mm);
        assert!(marker.x_mm < text.x_mm);
    }

    #[test]
    fn long_documents_break_across_pages() {
        let text: String = (1..=120)
            .map(|i| format!("Paragraph number {i} of the plan."))
            .collect::<Vec<_>>()
            .join("\n");
        let doc = parse_plan(&text, "Acme");
        let setup = PageSetup::default();
        let pages = layout(&doc, setup);
        assert!(pages.len() > 1);

        for page in &pages {
            assert!(!page.is_empty());
            for line in page {
                assert!(line.y_mm >= setup.margin_mm - 1e-3);
                assert!(line.y_mm <= setup.height_mm - setup.margin_mm);
            }
        }
        let texts = all_text(&pages);
        assert_eq!(texts.last(), Some(&"Paragraph number 120 of the plan."));
        assert_eq!(texts.len(), 121);
    }

    #[test]
    fn title_is_centered() {
        let doc = parse_plan("", "Acme");
        let setup = PageSetup::default();
        let pages = layout(&doc, setup);
        let title = &pages[0][0];
        let width = text_width_mm(&title.text, title.size_pt);
        let left = title.x_mm - setup.margin_mm;
        let right = setup.width_mm - setup.margin_mm - (title.x_mm + width);
        assert!((left - right).abs() < 0.01);
        assert_eq!(title.face, Face::Bold);
    }

    #[test]
    fn render_produces_pdf_bytes() {
        let doc = parse_plan(
            "1. Executive Summary\n- Point A\n\n2. Market Analysis\nStrong demand — “growing”.",
            "Acme Fitness Co",
        );
        let bytes = PdfExporter::default().render(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn render_rejects_bad_setup() {
        let exporter = PdfExporter::new(PageSetup {
            width_mm: 50.0,
            height_mm: 50.0,
            margin_mm: 20.0,
        });
        let doc = parse_plan("text", "Acme");
        assert!(matches!(
            exporter.render(&doc),
            Err(RenderError::InvalidPageSetup(_))
        ));
    }

    #[test]
    fn file_names() {
        assert_eq!(export_file_name("Acme Fitness Co"), "acme_fitness_co_business_plan.pdf");
        assert_eq!(export_file_name("  A&B  Labs! "), "a_b_labs_business_plan.pdf");
        assert_eq!(export_file_name(""), "business_plan.pdf");
        assert_eq!(export_file_name("!!!"), "business_plan.pdf");
    }
}
