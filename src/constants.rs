//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Completion retry constants
pub mod retry {
    /// Maximum attempts per completion call (first attempt included)
    pub const MAX_ATTEMPTS: usize = 5;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 1_000;
}

/// Chunking constants
pub mod chunking {
    /// Target chunk size in characters
    pub const CHUNK_SIZE: usize = 2_000;

    /// Overlap between consecutive chunks in characters
    pub const CHUNK_OVERLAP: usize = 200;
}

/// File analysis constants
pub mod analysis {
    /// Maximum number of source characters embedded in the summary prompt
    pub const SUMMARY_PROMPT_BUDGET: usize = 2_000;

    /// Requested upper bound for summary length (characters)
    pub const SUMMARY_CHAR_LIMIT: usize = 200;
}

/// File discovery constants
pub mod scanner {
    /// Extension of files considered for analysis
    pub const SOURCE_EXTENSION: &str = "py";

    /// Package-initializer filename excluded from analysis
    pub const PACKAGE_INITIALIZER: &str = "__init__.py";
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
}
