//! Markdown Wiki Rendering
//!
//! Pure rendering from an analysis batch to a single Markdown document.
//! The batch arrives in completion order; entries are sorted by path so
//! the artifact is stable across runs.

use std::path::Path;

use crate::types::{FileAnalysis, Result};

/// Render the analysis batch as a Markdown document.
pub fn render_wiki(batch: &[FileAnalysis]) -> String {
    let mut entries: Vec<&FileAnalysis> = batch.iter().collect();
    entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    let mut lines: Vec<String> = vec!["# Code Wiki".to_string(), String::new()];

    for entry in entries {
        lines.push(format!("## {}", entry.relative_path));
        if !entry.summary.is_empty() {
            lines.push(format!("> Summary: {}", entry.summary));
        }
        if !entry.classes.is_empty() {
            lines.push("### Classes:".to_string());
            for class in &entry.classes {
                lines.push(format!("- {}", class));
            }
        }
        if !entry.functions.is_empty() {
            lines.push("### Functions:".to_string());
            for function in &entry.functions {
                lines.push(format!("- {}", function));
            }
        }
        if !entry.chunk_embeddings.is_empty() {
            lines.push(format!("*Vectors: {}*", entry.chunk_embeddings.len()));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Write the rendered document, creating parent directories as needed.
pub fn write_wiki(path: &Path, markdown: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, markdown)?;
    Ok(())
}
