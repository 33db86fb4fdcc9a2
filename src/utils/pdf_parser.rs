use anyhow::{anyhow, Context, Result};
use pdf_extract::extract_text;
use std::path::Path;
use tracing::{debug, warn};

use super::text_processor::split_paragraphs;

/// Extract the embedded text layer of a PDF as paragraph elements in document order.
///
/// Scanned PDFs usually succeed here with little or no text; deciding whether
/// that is enough is up to the caller.
pub fn extract_text_from_pdf(path: &Path) -> Result<Vec<String>> {
    debug!("Extracting text layer from PDF: {:?}", path);

    // pdf-extract panics on some malformed font tables.
    let text = std::panic::catch_unwind(|| extract_text(path))
        .map_err(|_| anyhow!("PDF parser panicked on {:?}", path))?
        .with_context(|| format!("Failed to extract text from PDF: {:?}", path))?;

    let elements = split_paragraphs(&text);
    if elements.is_empty() {
        warn!("PDF appears to be scanned or has no extractable text: {:?}", path);
    }

    debug!("Extracted {} elements from PDF", elements.len());

    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_garbage_pdf_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a pdf").unwrap();

        assert!(extract_text_from_pdf(file.path()).is_err());
    }

    #[test]
    fn test_missing_pdf_is_an_error() {
        assert!(extract_text_from_pdf(Path::new("/nonexistent/file.pdf")).is_err());
    }
}
