use std::path::{Path, PathBuf};
use tracing::{info, info_span, warn};

use crate::document::DocumentRef;
use crate::error::{Result, SummarizerError};
use crate::extract::{ExtractionStrategy, FallbackPipeline, StrategyKind};
use crate::summarize::Summarizer;
use crate::utils::file_utils::{file_size_mb, generate_output_path, save_text_to_file, validate_file_path};

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub document: DocumentRef,
    pub source: StrategyKind,
    pub extracted_chars: usize,
    pub summary: String,
    pub output_path: PathBuf,
}

/// Validate, extract, summarize and persist a single document.
///
/// The output file is written only once a summary exists; every earlier
/// failure leaves the directory untouched.
pub fn summarize_document<S, O, M>(
    path: &Path,
    extractor: &FallbackPipeline<S, O>,
    summarizer: &M,
    output_suffix: &str,
) -> Result<SummaryReport>
where
    S: ExtractionStrategy,
    O: ExtractionStrategy,
    M: Summarizer + ?Sized,
{
    let document = validate_file_path(path)?;
    let _span = info_span!("document", path = %document.path().display()).entered();

    match file_size_mb(document.path()) {
        Ok(size) => info!("Processing document ({:.2} MB)", size),
        Err(e) => warn!("Could not read file size: {}", e),
    }

    info!("Starting text extraction...");
    let extraction = extractor.run(&document)?;

    if extraction.text.trim().is_empty() {
        return Err(SummarizerError::EmptyContent(document.path().to_path_buf()));
    }

    let extracted_chars = extraction.text.chars().count();
    info!(
        "Successfully extracted {} characters ({} strategy)",
        extracted_chars, extraction.source
    );

    info!("Generating summary...");
    let summary = summarizer.summarize(&extraction.text)?;

    let output_path = generate_output_path(document.path(), output_suffix);
    save_text_to_file(&summary, &output_path).map_err(|source| SummarizerError::Io {
        path: output_path.clone(),
        source,
    })?;
    info!("Summary saved to {:?}", output_path);

    Ok(SummaryReport {
        document,
        source: extraction.source,
        extracted_chars,
        summary,
        output_path,
    })
}
