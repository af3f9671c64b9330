//! Document assembly for generated business plans.
//!
//! Plan text comes back from the model loosely structured: numbered
//! headings, bullet lines, bold markers, plain paragraphs. This crate turns
//! it into a [`PlanDocument`] of classified blocks and renders that document
//! two ways:
//! - [`render_markdown`] for on-screen display
//! - [`PdfExporter`] for a paginated, downloadable file

pub mod blocks;
pub mod markdown;
pub mod parser;
pub mod pdf;

pub use blocks::{Block, PlanDocument, DEFAULT_COMPANY_NAME, TITLE_SUFFIX};
pub use markdown::render_markdown;
pub use parser::parse_plan;
pub use pdf::{export_file_name, PageSetup, PdfExporter, RenderError};
