use std::path::{Path, PathBuf};

use meridian_core::Report;

use crate::error::ExportError;
use crate::html::render_html;
use crate::layout::OutputLayout;
use crate::markdown::render_markdown;

/// Paths of the files written for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    pub markdown: PathBuf,
    pub html: PathBuf,
}

/// Renders both formats and writes them under `layout`, creating the output
/// directory if needed.
///
/// # Errors
///
/// Returns [`ExportError::Write`] naming the path that could not be written.
pub fn write_report(report: &Report, layout: &OutputLayout) -> Result<WrittenFiles, ExportError> {
    std::fs::create_dir_all(layout.root()).map_err(|source| ExportError::Write {
        path: layout.root().to_path_buf(),
        source,
    })?;

    let markdown = layout.markdown_path();
    write_file(&markdown, &render_markdown(report))?;
    tracing::info!(path = %markdown.display(), "markdown note written");

    let html = layout.html_path();
    write_file(&html, &render_html(report))?;
    tracing::info!(path = %html.display(), "HTML page written");

    Ok(WrittenFiles { markdown, html })
}

fn write_file(path: &Path, contents: &str) -> Result<(), ExportError> {
    std::fs::write(path, contents).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
