//! Wiki Generation
//!
//! Markdown rendering of analysis batches.

mod renderer;

pub use renderer::{render_wiki, write_wiki};
