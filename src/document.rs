//! Turns a parsed page into the structured Word document model.

use scraper::Html;
use tracing::warn;

use crate::extract::{self, Block, ExtractionError};

pub const FALLBACK_NOTICE: &str = "Could not structure content. Raw text below:";

/// Title plus body blocks, in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub body: Vec<Block>,
}

impl Document {
    pub fn new(url: &str) -> Self {
        Self {
            title: format!("Website Content: {}", url),
            body: Vec::new(),
        }
    }

    /// Build the document for `page`. Never fails: if the page cannot be
    /// structured, the body carries a notice and the raw page text instead.
    pub fn build(page: &Html, url: &str) -> Self {
        let extracted = extract::extract_blocks(page).map(|blocks| blocks.collect::<Vec<_>>());
        Self::assemble(url, extracted, || extract::raw_text(page))
    }

    fn assemble(
        url: &str,
        extracted: Result<Vec<Block>, ExtractionError>,
        raw_text: impl FnOnce() -> String,
    ) -> Self {
        let mut document = Self::new(url);
        match extracted {
            Ok(blocks) => document.body = blocks,
            Err(e) => {
                warn!(%url, error = %e, "falling back to raw page text");
                document.body.push(Block::paragraph(FALLBACK_NOTICE));
                document.body.push(Block::paragraph(raw_text()));
            }
        }
        document
    }
}
