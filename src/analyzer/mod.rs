//! Analysis Pipeline
//!
//! File discovery, per-file analysis units and the concurrent scheduler
//! that fans them out.

pub mod chunker;
pub mod entities;
pub mod scanner;
pub mod scheduler;
pub mod worker;

pub use chunker::Chunker;
pub use entities::{CodeEntities, extract_entities};
pub use scanner::{SourceFile, SourceScanner};
pub use scheduler::AnalysisScheduler;
pub use worker::FileAnalysisWorker;
