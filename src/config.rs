use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

pub const DEFAULT_API_VERSION: &str = "2024-05-01-preview";

/// Extensions accepted by the input path gate.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt"];

/// Credentials and routing for the Azure OpenAI deployment.
#[derive(Clone, PartialEq, Eq)]
pub struct AzureOpenAiConfig {
    pub api_key: String,
    pub api_version: String,
    pub endpoint: String,
    pub deployment: String,
}

impl AzureOpenAiConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Blank values count as missing. Every missing variable is reported in a
    /// single error so the user can fix them all at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = read("AZURE_OPENAI_API_KEY");
        let endpoint = read("AZURE_OPENAI_ENDPOINT");
        let deployment = read("AZURE_OPENAI_DEPLOYMENT");
        let api_version =
            read("AZURE_OPENAI_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let missing: Vec<String> = [
            ("AZURE_OPENAI_API_KEY", api_key.is_none()),
            ("AZURE_OPENAI_ENDPOINT", endpoint.is_none()),
            ("AZURE_OPENAI_DEPLOYMENT", deployment.is_none()),
        ]
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| name.to_string())
        .collect();

        match (api_key, endpoint, deployment) {
            (Some(api_key), Some(endpoint), Some(deployment)) => Ok(Self {
                api_key,
                api_version,
                endpoint,
                deployment,
            }),
            _ => Err(ConfigError::MissingVariables(missing)),
        }
    }
}

// Keeps the key out of logs.
impl fmt::Debug for AzureOpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureOpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    // Extraction
    pub min_text_length: usize,
    pub ocr_language: String,
    pub tesseract_path: String,
    pub pdftoppm_path: String,
    pub antiword_path: String,
    pub pandoc_path: String,

    // Summarization
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
    pub prompt_template: Option<String>,

    // Output
    pub output_suffix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_text_length: 500,
            ocr_language: "eng".to_string(),
            tesseract_path: "tesseract".to_string(),
            pdftoppm_path: "pdftoppm".to_string(),
            antiword_path: "antiword".to_string(),
            pandoc_path: "pandoc".to_string(),
            temperature: 0.5,
            max_tokens: 1500,
            request_timeout_secs: 120,
            prompt_template: None,
            output_suffix: "_summary".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load overrides from a JSON file; absent fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "temperature",
                reason: format!("{} is outside [0, 2]", self.temperature),
            });
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_tokens",
                reason: "must be > 0".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                reason: "must be > 0".to_string(),
            });
        }
        if self.output_suffix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "output_suffix",
                reason: "must not be empty".to_string(),
            });
        }
        if self.ocr_language.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "ocr_language",
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(template) = &self.prompt_template {
            if !template.contains(crate::summarize::DOCUMENT_PLACEHOLDER) {
                return Err(ConfigError::InvalidValue {
                    field: "prompt_template",
                    reason: format!(
                        "must contain the {} placeholder",
                        crate::summarize::DOCUMENT_PLACEHOLDER
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Everything a run needs, constructed once in `main` and passed down.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub azure: AzureOpenAiConfig,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    pub fn new(azure: AzureOpenAiConfig, pipeline: PipelineConfig) -> Result<Self, ConfigError> {
        pipeline.validate()?;
        Ok(Self { azure, pipeline })
    }
}
