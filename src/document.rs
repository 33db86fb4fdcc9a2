use std::path::{Path, PathBuf};

/// Immutable handle to a single input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    path: PathBuf,
    extension: String,
}

impl DocumentRef {
    /// Wrap a path. The extension is lowercased and has no leading dot;
    /// files without one get an empty extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        Self { path, extension }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn has_extension(&self, candidates: &[&str]) -> bool {
        candidates.contains(&self.extension.as_str())
    }
}
