//! Per-File Analysis Worker
//!
//! One worker invocation turns a discovered file into a complete
//! [`FileAnalysis`] record: read, extract entities, summarize, chunk and
//! embed. Every step is strictly sequential within the unit and any
//! failure surfaces as an error for the scheduler to downgrade to an
//! omission.

use tracing::debug;

use super::chunker::Chunker;
use super::entities::extract_entities;
use super::scanner::SourceFile;
use crate::ai::provider::SharedEmbeddings;
use crate::ai::retry::RetryingCompletionClient;
use crate::constants::analysis;
use crate::types::{FileAnalysis, Result};

pub struct FileAnalysisWorker {
    completions: RetryingCompletionClient,
    embeddings: SharedEmbeddings,
    chunker: Chunker,
}

impl FileAnalysisWorker {
    pub fn new(completions: RetryingCompletionClient, embeddings: SharedEmbeddings) -> Self {
        Self::with_chunker(completions, embeddings, Chunker::new())
    }

    pub fn with_chunker(
        completions: RetryingCompletionClient,
        embeddings: SharedEmbeddings,
        chunker: Chunker,
    ) -> Self {
        Self {
            completions,
            embeddings,
            chunker,
        }
    }

    /// Analyze one file. The record is fully populated on success; the
    /// caller treats any error as "no result" for this file.
    pub async fn process(&self, file: &SourceFile) -> Result<FileAnalysis> {
        debug!("Analyzing {}", file.relative_path);

        let source = tokio::fs::read_to_string(&file.path).await?;
        let entities = extract_entities(&source);
        let summary = self.summarize(&source).await?;

        let chunks = self.chunker.split(&source);
        let mut chunk_embeddings = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            chunk_embeddings.push(self.embeddings.embed(chunk).await?);
        }

        Ok(FileAnalysis {
            relative_path: file.relative_path.clone(),
            classes: entities.classes,
            functions: entities.functions,
            summary,
            chunk_embeddings,
        })
    }

    async fn summarize(&self, source: &str) -> Result<String> {
        let head: String = source.chars().take(analysis::SUMMARY_PROMPT_BUDGET).collect();
        let prompt = format!(
            "Summarize the key points of the following Python code in at most {} characters:\n\n{}",
            analysis::SUMMARY_CHAR_LIMIT,
            head
        );
        let completion = self.completions.complete(&prompt).await?;
        Ok(completion.content)
    }
}
