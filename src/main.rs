use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use doc_summarizer::{
    summarize_document, AppConfig, AzureOpenAiConfig, AzureOpenAiSummarizer, DefaultPipeline,
    PipelineConfig, Result, SummaryReport,
};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    arg_required_else_help = true,
    about = "Summarize a document with Azure OpenAI, using OCR when its text layer is too thin",
    after_help = "Supported file types: .pdf, .doc, .docx, .txt"
)]
struct Cli {
    /// Path to the document to summarize
    document: PathBuf,

    /// Path to a JSON file overriding pipeline settings
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Initialize tracing; logs go to stderr so stdout only carries the summary
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| std::env::var("LOG_LEVEL").map(|level| EnvFilter::new(level.to_lowercase())))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(parse_exit_code(&err));
        }
    };

    match summarize_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// `--help` and `--version` are not failures; every other parse error is.
fn parse_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

fn summarize_command(cli: Cli) -> Result<()> {
    let pipeline_config = match &cli.config {
        Some(path) => {
            info!("Loading pipeline configuration from: {:?}", path);
            PipelineConfig::from_file(path)?
        }
        None => PipelineConfig::default(),
    };

    let azure = AzureOpenAiConfig::from_env()?;
    let config = AppConfig::new(azure, pipeline_config)?;
    info!("Configuration loaded successfully");

    let summarizer = AzureOpenAiSummarizer::new(config.azure.clone(), &config.pipeline)?;
    let extractor = DefaultPipeline::from_config(&config.pipeline);

    info!("Processing document: {:?}", cli.document);
    let report = summarize_document(
        &cli.document,
        &extractor,
        &summarizer,
        &config.pipeline.output_suffix,
    )?;

    print_summary(&report);
    info!("Document summarization completed successfully");
    Ok(())
}

fn print_summary(report: &SummaryReport) {
    let rule = "=".repeat(50);
    println!("\n{}", rule);
    println!("DOCUMENT SUMMARY");
    println!("{}", rule);
    println!("{}", report.summary);
    println!("{}", rule);
    println!("\nSummary saved to: {}", report.output_path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_lists_supported_types() {
        let err = Cli::try_parse_from(["doc-summarizer"]).unwrap_err();
        assert_eq!(parse_exit_code(&err), 1);

        let usage = err.render().to_string();
        assert!(usage.contains("Supported file types: .pdf, .doc, .docx, .txt"));
        assert!(usage.contains(&doc_summarizer::utils::file_utils::supported_extensions_list()));
    }

    #[test]
    fn test_help_and_version_exit_zero() {
        for flag in ["--help", "--version"] {
            let err = Cli::try_parse_from(["doc-summarizer", flag]).unwrap_err();
            assert_eq!(parse_exit_code(&err), 0, "{flag}");
        }
    }

    #[test]
    fn test_unknown_flag_exits_one() {
        let err = Cli::try_parse_from(["doc-summarizer", "report.pdf", "--bogus"]).unwrap_err();
        assert_eq!(parse_exit_code(&err), 1);
    }

    #[test]
    fn test_document_and_config() {
        let cli = Cli::try_parse_from(["doc-summarizer", "report.pdf", "--config", "pipeline.json"])
            .unwrap();
        assert_eq!(cli.document, PathBuf::from("report.pdf"));
        assert_eq!(cli.config, Some(PathBuf::from("pipeline.json")));
    }
}
