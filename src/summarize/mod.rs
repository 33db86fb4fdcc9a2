mod azure;

pub use azure::AzureOpenAiSummarizer;

use crate::error::SummarizeError;

/// Placeholder replaced by the document text in custom prompt templates.
pub const DOCUMENT_PLACEHOLDER: &str = "{document_text}";

pub const SYSTEM_PROMPT: &str = "You are an expert assistant skilled at summarizing documents, \
charts, and financial data. You MUST provide summaries in exactly 4 sentences, no more, no less.";

/// Turns extracted text into a short natural-language summary.
pub trait Summarizer {
    fn summarize(&self, text: &str) -> Result<String, SummarizeError>;
}

impl<T: Summarizer + ?Sized> Summarizer for &T {
    fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        (**self).summarize(text)
    }
}

/// Build the user message. The full text is embedded; nothing is truncated.
pub fn build_prompt(document_text: &str, template: Option<&str>) -> String {
    match template {
        Some(template) => template.replace(DOCUMENT_PLACEHOLDER, document_text),
        None => format!(
            "Summarize the following document (including any OCR-extracted chart or table text):\n\n\
             ---\n\n{}\n\n---\n\n\
             Please provide a comprehensive summary that captures the key points, \
             main themes, and important details from the document. If there are any \
             charts, tables, or numerical data mentioned, please include those insights \
             in your summary as well.\n\nSummary:",
            document_text
        ),
    }
}
