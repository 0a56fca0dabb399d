use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use habit_core::export_pdf;

/// Execute `habit export`: render plan text from `input` (a file path, or
/// `-` for stdin) to PDF. Returns the written path.
pub fn run_export(input: &str, output: Option<&Path>) -> Result<PathBuf> {
    let text = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read plan text from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("cannot read plan file: {input}"))?
    };

    let path = export_pdf(&text, output).context("failed to export plan")?;
    Ok(path)
}
