//! Turning files on disk into raw text.

use crate::error::ExtractError;
use anyhow::{bail, Result};
use scraper::{Html, Node};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Produces raw text for a document path. Format-specific parsing lives behind this.
pub trait Extractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Reads UTF-8 text files as-is and reduces HTML to its visible text.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileExtractor;

const BINARY_FORMATS: &[&str] = &["pdf", "doc", "docx", "odt", "rtf", "ppt", "pptx", "xls", "xlsx", "epub"];

impl Extractor for FileExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();
        if BINARY_FORMATS.contains(&ext.as_str()) {
            return Err(ExtractError::Unsupported(ext));
        }

        let bytes = fs::read(path)?;
        let text = String::from_utf8(bytes).map_err(|_| ExtractError::NotUtf8)?;
        if matches!(ext.as_str(), "html" | "htm") {
            Ok(html_text(&text))
        } else {
            Ok(text)
        }
    }
}

/// Visible text of an HTML document, skipping script and style bodies.
pub fn html_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts: Vec<&str> = Vec::new();
    for node in document.root_element().descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node
                .parent()
                .and_then(|p| p.value().as_element().map(|e| matches!(e.name(), "script" | "style")))
                .unwrap_or(false);
            let trimmed = text.trim();
            if !hidden && !trimmed.is_empty() {
                parts.push(trimmed);
            }
        }
    }
    parts.join(" ")
}

/// Regular files under `dir`, sorted by path so document ids are assigned deterministically.
/// Without `recursive` only the top level is listed.
pub fn collect_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("document directory not found: {}", dir.display());
    }
    let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }
    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(e) if e.file_type().is_file() => files.push(e.into_path()),
            Ok(_) => {}
            Err(err) => tracing::warn!(error = %err, "skipping unreadable directory entry"),
        }
    }
    Ok(files)
}
