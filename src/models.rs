use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

pub const DOCX_FILE_NAME: &str = "webpage_content.docx";
pub const PDF_FILE_NAME: &str = "webpage_content.pdf";
pub const SUCCESS_MESSAGE: &str = "Extraction complete! Download your files below.";

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub url: String,
}

/// A generated file, carried inline as base64.
#[derive(Debug, Serialize, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub content_type: String,
    pub label: String,
    pub size: usize,
    pub data: String,
}

impl Artifact {
    pub fn new(file_name: &str, content_type: &str, label: &str, bytes: &[u8]) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            label: label.to_string(),
            size: bytes.len(),
            data: STANDARD.encode(bytes),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub message: String,
    pub source_url: String,
    pub document: Artifact,
    pub pdf: Option<Artifact>,
    pub warning: Option<String>,
}
