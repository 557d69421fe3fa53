//! Shared Types
//!
//! Core data model and the unified error type.

pub mod error;

pub use error::{Result, WikiError};

use serde::{Deserialize, Serialize};

/// Complete analysis result for a single source file.
///
/// Produced entirely within one worker invocation and never mutated
/// afterwards. A batch contains at most one record per discovered file;
/// batch order is completion order and carries no meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAnalysis {
    /// Path relative to the scanned root; unique key within a batch
    pub relative_path: String,
    /// Class names in declaration order, possibly empty
    pub classes: Vec<String>,
    /// Function names in declaration order, possibly empty
    pub functions: Vec<String>,
    /// Natural-language summary from the completion model
    pub summary: String,
    /// One embedding vector per chunk, preserving chunk order
    pub chunk_embeddings: Vec<Vec<f32>>,
}
