use std::fmt;

use crate::document::DocumentRef;

/// The capability set the fallback pipeline chooses from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Structured,
    Ocr,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Structured => write!(f, "structured"),
            StrategyKind::Ocr => write!(f, "ocr"),
        }
    }
}

/// Text produced by one strategy, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub source: StrategyKind,
}

/// Either text or the reason there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Success(Extraction),
    Failure(String),
}

impl ExtractionOutcome {
    /// Fold a fallible extraction into an outcome, keeping the full error chain.
    pub fn from_result(source: StrategyKind, result: anyhow::Result<String>) -> Self {
        match result {
            Ok(text) => ExtractionOutcome::Success(Extraction { text, source }),
            Err(e) => ExtractionOutcome::Failure(format!("{:#}", e)),
        }
    }
}

/// A way of turning a document into plain text.
pub trait ExtractionStrategy {
    fn kind(&self) -> StrategyKind;

    /// Pure check on the file extension; never reads the file.
    fn can_handle(&self, doc: &DocumentRef) -> bool;

    /// Never panics or returns early with an error: every problem becomes `Failure`.
    fn extract(&self, doc: &DocumentRef) -> ExtractionOutcome;
}

impl<T: ExtractionStrategy + ?Sized> ExtractionStrategy for &T {
    fn kind(&self) -> StrategyKind {
        (**self).kind()
    }

    fn can_handle(&self, doc: &DocumentRef) -> bool {
        (**self).can_handle(doc)
    }

    fn extract(&self, doc: &DocumentRef) -> ExtractionOutcome {
        (**self).extract(doc)
    }
}
