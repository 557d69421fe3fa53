//! Concurrent Analysis Scheduler
//!
//! Discovers candidate files and fans their analysis out across a bounded
//! worker pool. Units are independent: a failing file is logged and
//! omitted from the batch, never aborting its siblings. `analyze` returns
//! only after every submitted unit reached a terminal state.

use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;
use tracing::{info, warn};

use super::scanner::SourceScanner;
use super::worker::FileAnalysisWorker;
use crate::types::{FileAnalysis, Result};

pub struct AnalysisScheduler {
    worker: Arc<FileAnalysisWorker>,
    concurrency: usize,
    extension: String,
    initializer: String,
}

impl AnalysisScheduler {
    /// Create a scheduler over the given worker with a bounded pool size.
    pub fn new(worker: FileAnalysisWorker, concurrency: usize) -> Self {
        Self {
            worker: Arc::new(worker),
            concurrency: concurrency.max(1),
            extension: crate::constants::scanner::SOURCE_EXTENSION.to_string(),
            initializer: crate::constants::scanner::PACKAGE_INITIALIZER.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_initializer(mut self, initializer: impl Into<String>) -> Self {
        self.initializer = initializer.into();
        self
    }

    /// Analyze every candidate file under `root`.
    ///
    /// The returned batch holds one record per successfully analyzed file
    /// in completion order; consumers must not rely on ordering. Only a
    /// failure to enumerate the root itself is fatal.
    pub async fn analyze(&self, root: &Path) -> Result<Vec<FileAnalysis>> {
        let files = SourceScanner::new(root)
            .with_extension(&self.extension)
            .with_initializer(&self.initializer)
            .scan()?;

        info!(
            "Discovered {} source files under {}",
            files.len(),
            root.display()
        );

        let mut stream = futures::stream::iter(files)
            .map(|file| {
                let worker = Arc::clone(&self.worker);
                async move {
                    let result = worker.process(&file).await;
                    (file, result)
                }
            })
            .buffer_unordered(self.concurrency);

        let mut batch = Vec::new();
        while let Some((file, result)) = stream.next().await {
            match result {
                Ok(analysis) => batch.push(analysis),
                Err(e) => warn!("Failed to analyze {}: {}", file.relative_path, e),
            }
        }

        info!("Analyzed {} files", batch.len());
        Ok(batch)
    }
}
