//! Path utilities

use std::path::{Path, PathBuf};

use crate::domain::errors::DomainError;

/// Path utilities for cache-key and traversal handling
pub struct PathUtils;

impl PathUtils {
    /// Resolve `path` to an absolute form with symlinks and `.`/`..` removed.
    ///
    /// Two spellings of the same file resolve to the same result; a missing file is an error.
    pub fn canonicalize(path: &Path) -> Result<PathBuf, DomainError> {
        std::fs::canonicalize(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DomainError::FileNotFound(path.display().to_string()),
            _ => DomainError::BadArgs(format!("Cannot resolve {}: {}", path.display(), e)),
        })
    }

    /// Get file extension from path, lowercased
    pub fn get_extension(path: &Path) -> Option<String> {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    /// Hidden files and directories (leading dot) are skipped during traversal
    pub fn is_hidden(path: &Path) -> bool {
        path.file_name()
            .map(|name| name.to_string_lossy().starts_with('.'))
            .unwrap_or(false)
    }
}
