use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use habit_core::{GenerationConfig, ModelGateway, PdfRenderer, generate, render_document};

use crate::generate_cmd::GenerationReport;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State and request types
// ---------------------------------------------------------------------------

/// Shared by every request: the one model gateway of this process and the
/// generation settings.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn ModelGateway>,
    pub config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Absent and blank goals are both rejected by the sanitizer.
    #[serde(default)]
    pub goal: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub text: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/generate", post(generate_handler))
        .route("/api/export", post(export_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("habit serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("habit serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C; shutting down");
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn generate_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerationReport>, AppError> {
    let Json(request) = payload?;
    let generation = generate(request.goal.as_deref(), state.model.as_ref(), &state.config).await;
    Ok(Json(GenerationReport::from(&generation)))
}

async fn export_handler(
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<axum::response::Response, AppError> {
    let Json(request) = payload?;
    let bytes = render_document(&PdfRenderer::now(), &request.text).map_err(|e| {
        tracing::error!(error = %e, "PDF export failed");
        AppError::internal(e.to_string())
    })?;
    tracing::info!(bytes = bytes.len(), "exported plan over HTTP");
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"habit-plan.pdf\"",
            ),
        ],
        bytes,
    )
        .into_response())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>SMART Habit Plan</title>
<style>
body { font-family: sans-serif; max-width: 60em; margin: 2em auto; }
textarea { width: 100%; box-sizing: border-box; }
.versions { display: flex; gap: 1em; }
.versions > div { flex: 1; }
</style></head><body>
<h1>SMART Habit Plan</h1>
<p>Describe a goal in a few words. You get three plans to edit and export.</p>
<textarea id="goal" rows="3" placeholder="I want to lose weight"></textarea>
<p><button id="generate">Generate</button> <span id="status"></span></p>
<div class="versions">
<div><h3>Version 1</h3><textarea id="v0" rows="12"></textarea><button data-v="0">Export PDF</button></div>
<div><h3>Version 2</h3><textarea id="v1" rows="12"></textarea><button data-v="1">Export PDF</button></div>
<div><h3>Version 3</h3><textarea id="v2" rows="12"></textarea><button data-v="2">Export PDF</button></div>
</div>
<script>
const status = document.getElementById("status");
document.getElementById("generate").onclick = async () => {
  status.textContent = "Generating...";
  const resp = await fetch("/api/generate", {
    method: "POST",
    headers: { "content-type": "application/json" },
    body: JSON.stringify({ goal: document.getElementById("goal").value }),
  });
  const report = await resp.json();
  report.versions.forEach((v, i) => { document.getElementById("v" + i).value = v.text; });
  status.textContent = report.rejected || "";
};
document.querySelectorAll("button[data-v]").forEach((btn) => {
  btn.onclick = async () => {
    const text = document.getElementById("v" + btn.dataset.v).value;
    const resp = await fetch("/api/export", {
      method: "POST",
      headers: { "content-type": "application/json" },
      body: JSON.stringify({ text }),
    });
    const url = URL.createObjectURL(await resp.blob());
    const a = document.createElement("a");
    a.href = url;
    a.download = "habit-plan.pdf";
    a.click();
    URL.revokeObjectURL(url);
  };
});
</script>
</body></html>
"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
