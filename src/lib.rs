// Library exports for the CLI and for embedding the pipeline elsewhere

pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod summarize;
pub mod utils;

// Re-export commonly used types
pub use config::{AppConfig, AzureOpenAiConfig, PipelineConfig};
pub use document::DocumentRef;
pub use error::{SummarizerError, Result};
pub use extract::{DefaultPipeline, FallbackPipeline, FallbackState};
pub use pipeline::{summarize_document, SummaryReport};
pub use summarize::{AzureOpenAiSummarizer, Summarizer};
