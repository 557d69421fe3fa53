//! Source File Discovery
//!
//! Recursive enumeration of candidate files under a root directory.
//! Directories whose name starts with `.` are pruned from traversal;
//! files are kept when they carry the configured source extension and
//! are not the package-initializer file.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::constants::scanner;
use crate::types::Result;

/// A discovered candidate file
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Absolute path for reading
    pub path: PathBuf,
    /// Path relative to the scanned root; batch key
    pub relative_path: String,
}

pub struct SourceScanner {
    root: PathBuf,
    extension: String,
    initializer: String,
}

impl SourceScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extension: scanner::SOURCE_EXTENSION.to_string(),
            initializer: scanner::PACKAGE_INITIALIZER.to_string(),
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

    /// Enumerate candidate files. Discovery order is not significant.
    ///
    /// An unreadable root directory is the only fatal condition; unreadable
    /// subtrees are skipped.
    pub fn scan(&self) -> Result<Vec<SourceFile>> {
        // Surface an unreadable root as an IO error up front; the walker
        // would silently yield nothing for it.
        std::fs::read_dir(&self.root)?;

        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(false)
            .filter_entry(|entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                let hidden = entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with('.'));
                !(is_dir && hidden)
            })
            .build();

        let mut files = Vec::new();
        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() || !self.is_candidate(path) {
                continue;
            }

            let relative_path = match path.strip_prefix(&self.root) {
                Ok(relative) => relative.to_string_lossy().to_string(),
                Err(_) => continue,
            };

            files.push(SourceFile {
                path: path.to_path_buf(),
                relative_path,
            });
        }

        Ok(files)
    }

    fn is_candidate(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        name != self.initializer
            && path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext == self.extension)
    }
}
