//! Export of an edited plan to a document file.
//!
//! The exporter takes plan text verbatim (usually edited by the user after
//! generation) and has no opinion on its structure.

pub mod pdf;

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

pub use pdf::PdfRenderer;

/// Text exported when the input is blank.
pub const EMPTY_EXPORT_TEXT: &str = "No content to export";

/// Errors from rendering or writing an exported document.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create temporary export file: {0}")]
    TempFile(#[source] std::io::Error),
    #[error("failed to render document: {0}")]
    Render(String),
}

/// Renders plan text into document bytes.
pub trait DocumentRenderer {
    /// File extension for the rendered format, without the dot.
    fn extension(&self) -> &str;

    /// Render `text` into a complete document.
    fn render(&self, text: &str) -> Result<Vec<u8>, ExportError>;
}

/// Render `text` to a PDF stamped with the current local time.
///
/// Writes to `output` when given, otherwise to a new temporary file that is
/// kept on disk. Returns the written path.
pub fn export_pdf(text: &str, output: Option<&Path>) -> Result<PathBuf, ExportError> {
    export_with(&PdfRenderer::now(), text, output)
}

/// Render `text` with `renderer`, substituting [`EMPTY_EXPORT_TEXT`] for
/// blank input.
pub fn render_document(
    renderer: &dyn DocumentRenderer,
    text: &str,
) -> Result<Vec<u8>, ExportError> {
    let text = if text.trim().is_empty() {
        EMPTY_EXPORT_TEXT
    } else {
        text
    };
    renderer.render(text)
}

/// Render `text` with `renderer` and write it out.
pub fn export_with(
    renderer: &dyn DocumentRenderer,
    text: &str,
    output: Option<&Path>,
) -> Result<PathBuf, ExportError> {
    let bytes = render_document(renderer, text)?;

    let path = match output {
        Some(path) => {
            std::fs::write(path, &bytes).map_err(|source| ExportError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            path.to_path_buf()
        }
        None => {
            let mut file = tempfile::Builder::new()
                .prefix("habit-plan-")
                .suffix(&format!(".{}", renderer.extension()))
                .tempfile()
                .map_err(ExportError::TempFile)?;
            file.write_all(&bytes).map_err(|source| ExportError::Io {
                path: file.path().to_path_buf(),
                source,
            })?;
            let (_, path) = file.keep().map_err(|e| ExportError::TempFile(e.error))?;
            path
        }
    };

    info!(path = %path.display(), bytes = bytes.len(), "exported plan");
    Ok(path)
}
