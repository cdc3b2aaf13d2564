use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

pub const CONTENT_TYPE: &str = "application/pdf";

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("could not start renderer: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("renderer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("renderer produced an empty file")]
    EmptyOutput,
    #[error("temporary file error: {0}")]
    Io(#[from] std::io::Error),
}

// ── Renderer seam ────────────────────────────────────────────────────────────

/// Renders a live URL into PDF bytes.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn render(&self, url: &str) -> Result<Vec<u8>, RenderError>;
}

/// Shells out to `wkhtmltopdf` with its default settings.
#[derive(Debug, Clone)]
pub struct Wkhtmltopdf {
    binary: PathBuf,
}

impl Wkhtmltopdf {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for Wkhtmltopdf {
    fn default() -> Self {
        Self::new("wkhtmltopdf")
    }
}

#[async_trait]
impl PdfRenderer for Wkhtmltopdf {
    fn name(&self) -> &'static str {
        "wkhtmltopdf"
    }

    async fn render(&self, url: &str) -> Result<Vec<u8>, RenderError> {
        // Removed when `output` drops, on every return path.
        let output = tempfile::Builder::new()
            .prefix("webpage_content_")
            .suffix(".pdf")
            .tempfile()?;

        debug!(binary = %self.binary.display(), %url, path = %output.path().display(), "rendering pdf");

        let result = Command::new(&self.binary)
            .arg("--quiet")
            .arg(url)
            .arg(output.path())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(RenderError::Spawn)?;

        if !result.status.success() {
            return Err(RenderError::Failed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        let bytes = tokio::fs::read(output.path()).await?;
        if bytes.is_empty() {
            return Err(RenderError::EmptyOutput);
        }
        Ok(bytes)
    }
}
