//! Structured-first extraction with an OCR fallback.
//!
//! The policy lives entirely in [`FallbackPipeline::step`]:
//!
//! ```text
//! TryingStructured --ok, long enough--------------------> Done
//!        |  failure, or shorter than the threshold
//!        v
//!    TryingOcr -------ok (any length, even empty)-------> Done
//!        |  not applicable to the extension, or failure
//!        v
//!    Exhausted
//! ```
//!
//! Structured extraction is never gated on `can_handle`; OCR always is.

use tracing::{info, warn};

use super::strategy::{Extraction, ExtractionOutcome, ExtractionStrategy};
use crate::document::DocumentRef;
use crate::error::ExtractionError;
use crate::utils::text_processor::trimmed_len;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackState {
    TryingStructured,
    TryingOcr,
    Done(Extraction),
    Exhausted(ExtractionError),
}

impl FallbackState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FallbackState::Done(_) | FallbackState::Exhausted(_))
    }
}

pub struct FallbackPipeline<S, O> {
    structured: S,
    ocr: O,
    min_text_length: usize,
}

impl<S: ExtractionStrategy, O: ExtractionStrategy> FallbackPipeline<S, O> {
    pub fn new(structured: S, ocr: O, min_text_length: usize) -> Self {
        Self {
            structured,
            ocr,
            min_text_length,
        }
    }

    /// Drive the state machine to a terminal state.
    pub fn run(&self, doc: &DocumentRef) -> Result<Extraction, ExtractionError> {
        let mut attempts = Vec::new();
        let mut state = FallbackState::TryingStructured;

        while !state.is_terminal() {
            state = self.step(doc, state, &mut attempts);
        }

        match state {
            FallbackState::Done(extraction) => Ok(extraction),
            FallbackState::Exhausted(err) => Err(err),
            FallbackState::TryingStructured | FallbackState::TryingOcr => {
                unreachable!("loop exits only on terminal states")
            }
        }
    }

    /// Perform the work of one non-terminal state and return the next one.
    ///
    /// Each rejected attempt appends a line to `attempts`, which ends up in the
    /// aggregate error if the pipeline is exhausted.
    pub fn step(
        &self,
        doc: &DocumentRef,
        state: FallbackState,
        attempts: &mut Vec<String>,
    ) -> FallbackState {
        match state {
            FallbackState::TryingStructured => match self.structured.extract(doc) {
                ExtractionOutcome::Success(extraction) => {
                    let len = trimmed_len(&extraction.text);
                    if len >= self.min_text_length {
                        info!("Successfully extracted text using {} parser", extraction.source);
                        FallbackState::Done(extraction)
                    } else {
                        warn!(
                            "Extracted text too short ({} < {} chars). Trying OCR...",
                            len, self.min_text_length
                        );
                        attempts.push(format!(
                            "{}: text too short ({} < {} chars)",
                            self.structured.kind(),
                            len,
                            self.min_text_length
                        ));
                        FallbackState::TryingOcr
                    }
                }
                ExtractionOutcome::Failure(reason) => {
                    warn!("Structured extraction failed. Trying OCR...");
                    attempts.push(format!("{}: {}", self.structured.kind(), reason));
                    FallbackState::TryingOcr
                }
            },
            FallbackState::TryingOcr => {
                if !self.ocr.can_handle(doc) {
                    warn!(
                        "OCR does not support '{}' files; no fallback available",
                        doc.extension()
                    );
                    attempts.push(format!(
                        "{}: not applicable to '{}' files",
                        self.ocr.kind(),
                        doc.extension()
                    ));
                    return self.exhausted(doc, attempts);
                }

                match self.ocr.extract(doc) {
                    // Last resort: accepted whatever its length.
                    ExtractionOutcome::Success(extraction) => {
                        info!("Successfully extracted text using OCR");
                        FallbackState::Done(extraction)
                    }
                    ExtractionOutcome::Failure(reason) => {
                        warn!("OCR extraction also failed");
                        attempts.push(format!("{}: {}", self.ocr.kind(), reason));
                        self.exhausted(doc, attempts)
                    }
                }
            }
            terminal => terminal,
        }
    }

    fn exhausted(&self, doc: &DocumentRef, attempts: &mut Vec<String>) -> FallbackState {
        FallbackState::Exhausted(ExtractionError {
            path: doc.path().to_path_buf(),
            attempts: std::mem::take(attempts),
        })
    }
}
