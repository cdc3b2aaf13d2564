use std::fmt;
use std::sync::Arc;

use scraper::Html;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::docx::{self, DocxError};
use crate::document::Document;
use crate::error::{ExportError, INVALID_URL_MESSAGE};
use crate::fetch::{self, FetchConfig, Page};
use crate::render::PdfRenderer;

pub const PDF_WARNING: &str = "PDF generation failed (site may block rendering or require login).";

// ── Stages ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Validating,
    Fetching,
    Extracting,
    Rendering,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Validating => "validating",
            Stage::Fetching => "fetching",
            Stage::Extracting => "extracting",
            Stage::Rendering => "rendering",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

struct Progress<'a> {
    url: &'a str,
    stage: Stage,
}

impl<'a> Progress<'a> {
    fn start(url: &'a str) -> Self {
        Self {
            url,
            stage: Stage::Idle,
        }
    }

    fn advance(&mut self, next: Stage) {
        debug!(url = %self.url, from = %self.stage, to = %next, "export stage");
        self.stage = next;
    }
}

// ── Result type ──────────────────────────────────────────────────────────────

/// Artifacts of one finished export. The PDF is absent on degraded success.
#[derive(Debug)]
pub struct Export {
    pub url: String,
    pub document: Vec<u8>,
    pub pdf: Option<Vec<u8>>,
}

impl Export {
    pub fn warning(&self) -> Option<&'static str> {
        self.pdf.is_none().then_some(PDF_WARNING)
    }
}

// ── Orchestrator ─────────────────────────────────────────────────────────────

pub struct Exporter {
    fetch: FetchConfig,
    renderer: Arc<dyn PdfRenderer>,
}

impl Exporter {
    pub fn new(fetch: FetchConfig, renderer: Arc<dyn PdfRenderer>) -> Self {
        Self { fetch, renderer }
    }

    pub async fn export(&self, input: &str) -> Result<Export, ExportError> {
        let mut progress = Progress::start(input);

        progress.advance(Stage::Validating);
        let url = validate_url(input)?;

        progress.advance(Stage::Fetching);
        let page = fetch::fetch_page(&url, &self.fetch).await.map_err(|e| {
            warn!(%url, error = %e, "fetch failed");
            ExportError::from(e)
        })?;

        progress.advance(Stage::Extracting);
        let document = build_document_file(&page)?;

        progress.advance(Stage::Rendering);
        let pdf = match self.renderer.render(&url).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(%url, renderer = self.renderer.name(), error = %e, "pdf render failed");
                None
            }
        };

        progress.advance(Stage::Done);
        info!(
            %url,
            document_bytes = document.len(),
            pdf_bytes = pdf.as_ref().map_or(0, Vec::len),
            "export complete"
        );

        Ok(Export { url, document, pdf })
    }
}

/// Trimmed `input` if it is an absolute http(s) URL.
pub fn validate_url(input: &str) -> Result<String, ExportError> {
    let trimmed = input.trim();
    let invalid = || ExportError::Validation(INVALID_URL_MESSAGE.to_string());
    if trimmed.is_empty() {
        return Err(invalid());
    }
    let parsed = Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    Ok(trimmed.to_string())
}

// The parsed tree is not `Send`, so it must not live across an await point.
fn build_document_file(page: &Page) -> Result<Vec<u8>, ExportError> {
    let tree = Html::parse_document(&page.html);
    let document = Document::build(&tree, &page.url);
    debug!(url = %page.url, blocks = document.body.len(), "document built");
    docx::to_docx(&document).map_err(|e| serialization_failed(&page.url, e))
}

fn serialization_failed(url: &str, e: DocxError) -> ExportError {
    error!(%url, error = %e, "document serialization failed");
    ExportError::Unexpected(e.to_string())
}
