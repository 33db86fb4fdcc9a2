use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing::{error, info};

use super::strategy::{ExtractionOutcome, ExtractionStrategy, StrategyKind};
use crate::document::DocumentRef;
use crate::utils::office_parser::{
    extract_doc_elements, extract_docx_elements, extract_odt_elements, extract_rtf_elements,
};
use crate::utils::pdf_parser::extract_text_from_pdf;
use crate::utils::text_processor::{join_units, split_paragraphs};

/// Formats the native parsers understand.
pub const STRUCTURED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "rtf", "odt"];

/// Parses a document's own format into elements without rendering it.
#[derive(Debug, Clone)]
pub struct StructuredExtractor {
    antiword_path: String,
    pandoc_path: String,
}

impl StructuredExtractor {
    /// `antiword` converts legacy `.doc` files; `pandoc` converts `.rtf`.
    pub fn new(antiword_path: impl Into<String>, pandoc_path: impl Into<String>) -> Self {
        Self {
            antiword_path: antiword_path.into(),
            pandoc_path: pandoc_path.into(),
        }
    }

    fn elements(&self, doc: &DocumentRef) -> Result<Vec<String>> {
        let path = doc.path();
        match doc.extension() {
            "pdf" => extract_text_from_pdf(path),
            "docx" => extract_docx_elements(path),
            "odt" => extract_odt_elements(path),
            "doc" => extract_doc_elements(path, &self.antiword_path),
            "rtf" => extract_rtf_elements(path, &self.pandoc_path),
            "txt" => read_plain_text(path),
            other => bail!("Unsupported file format: '{}'", other),
        }
    }
}

impl Default for StructuredExtractor {
    fn default() -> Self {
        Self::new("antiword", "pandoc")
    }
}

impl ExtractionStrategy for StructuredExtractor {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Structured
    }

    fn can_handle(&self, doc: &DocumentRef) -> bool {
        doc.has_extension(STRUCTURED_EXTENSIONS)
    }

    fn extract(&self, doc: &DocumentRef) -> ExtractionOutcome {
        info!("Extracting text from {:?} using structured parser...", doc.path());

        let result = self
            .elements(doc)
            .map(join_units)
            .with_context(|| format!("Structured extraction failed for {:?}", doc.path()));

        match &result {
            Ok(text) => info!("Successfully extracted {} characters", text.chars().count()),
            Err(e) => error!("{:#}", e),
        }

        ExtractionOutcome::from_result(self.kind(), result)
    }
}

fn read_plain_text(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read text file: {:?}", path))?;
    Ok(split_paragraphs(&String::from_utf8_lossy(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_can_handle_is_extension_only() {
        let extractor = StructuredExtractor::default();
        assert!(extractor.can_handle(&DocumentRef::new("/nonexistent/a.DOCX")));
        assert!(extractor.can_handle(&DocumentRef::new("/nonexistent/a.rtf")));
        assert!(!extractor.can_handle(&DocumentRef::new("/nonexistent/a.png")));
    }

    #[test]
    fn test_plain_text_paragraphs_are_joined() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "  First paragraph.\r\n\r\n\r\nSecond\nparagraph.  \n").unwrap();

        let outcome = StructuredExtractor::default().extract(&DocumentRef::new(&path));
        match outcome {
            ExtractionOutcome::Success(extraction) => {
                assert_eq!(extraction.text, "First paragraph.\n\nSecond\nparagraph.");
                assert_eq!(extraction.source, StrategyKind::Structured);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_empty_text_file_is_an_empty_success() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "").unwrap();

        let outcome = StructuredExtractor::default().extract(&DocumentRef::new(&path));
        assert!(matches!(
            outcome,
            ExtractionOutcome::Success(ref e) if e.text.is_empty()
        ));
    }

    #[test]
    fn test_corrupt_pdf_becomes_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, b"%PDF-1.4 truncated").unwrap();

        let outcome = StructuredExtractor::default().extract(&DocumentRef::new(&path));
        match outcome {
            ExtractionOutcome::Failure(reason) => {
                assert!(reason.contains("Structured extraction failed"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_rtf_uses_configured_converter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("letter.rtf");
        fs::write(&path, r"{\rtf1\ansi Hello\par}").unwrap();

        let extractor = StructuredExtractor::new("antiword", "/nonexistent/pandoc");
        match extractor.extract(&DocumentRef::new(&path)) {
            ExtractionOutcome::Failure(reason) => {
                assert!(reason.contains("Failed to run /nonexistent/pandoc"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_format_becomes_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.png");
        fs::write(&path, b"\x89PNG").unwrap();

        let outcome = StructuredExtractor::default().extract(&DocumentRef::new(&path));
        assert!(matches!(
            outcome,
            ExtractionOutcome::Failure(ref reason) if reason.contains("Unsupported file format")
        ));
    }
}
