//! HTTP surface: the export page, health check, and the export endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::docx;
use crate::error::ExportError;
use crate::export::Exporter;
use crate::models::{
    Artifact, ExportRequest, ExportResponse, DOCX_FILE_NAME, PDF_FILE_NAME, SUCCESS_MESSAGE,
};
use crate::render;

const INDEX_HTML: &str = include_str!("index.html");

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub exporter: Arc<Exporter>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/api/export", post(handle_export))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn handle_export(
    State(state): State<AppState>,
    body: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Json<ExportResponse>, ExportError> {
    let Json(req) = body.map_err(|rejection| {
        error!(error = %rejection.body_text(), "unreadable export request");
        ExportError::Unexpected(rejection.body_text())
    })?;
    let export = state.exporter.export(&req.url).await?;

    let document = Artifact::new(
        DOCX_FILE_NAME,
        docx::CONTENT_TYPE,
        "Download Word Document",
        &export.document,
    );
    let pdf = export.pdf.as_deref().map(|bytes| {
        Artifact::new(
            PDF_FILE_NAME,
            render::CONTENT_TYPE,
            "Download PDF (Webpage Look)",
            bytes,
        )
    });

    Ok(Json(ExportResponse {
        message: SUCCESS_MESSAGE.to_string(),
        warning: export.warning().map(str::to_string),
        source_url: export.url,
        document,
        pdf,
    }))
}
