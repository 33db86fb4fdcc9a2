use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SUPPORTED_EXTENSIONS;
use crate::document::DocumentRef;
use crate::error::InputError;

/// Check that the path exists, is a regular file and has a supported extension.
pub fn validate_file_path(path: &Path) -> Result<DocumentRef, InputError> {
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(InputError::NotAFile(path.to_path_buf()));
    }

    let doc = DocumentRef::new(path);
    if !doc.has_extension(SUPPORTED_EXTENSIONS) {
        return Err(InputError::UnsupportedExtension {
            extension: path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default(),
            supported: supported_extensions_list(),
        });
    }

    Ok(doc)
}

/// `.pdf, .doc, .docx, .txt`
pub fn supported_extensions_list() -> String {
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|e| format!(".{}", e))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Sibling path `<stem><suffix>.txt` next to the input.
pub fn generate_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}{}.txt", stem, suffix))
}

/// Write the text as UTF-8 with no framing.
pub fn save_text_to_file(text: &str, output: &Path) -> std::io::Result<()> {
    fs::write(output, text.as_bytes())
}

pub fn file_size_mb(path: &Path) -> std::io::Result<f64> {
    Ok(fs::metadata(path)?.len() as f64 / (1024.0 * 1024.0))
}
