use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use super::{build_prompt, Summarizer, SYSTEM_PROMPT};
use crate::config::{AzureOpenAiConfig, PipelineConfig};
use crate::error::SummarizeError;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Chat-completions client for an Azure OpenAI deployment. One request per call, no retries.
pub struct AzureOpenAiSummarizer {
    client: reqwest::blocking::Client,
    config: AzureOpenAiConfig,
    temperature: f32,
    max_tokens: u32,
    prompt_template: Option<String>,
}

impl AzureOpenAiSummarizer {
    pub fn new(config: AzureOpenAiConfig, pipeline: &PipelineConfig) -> Result<Self, SummarizeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(pipeline.request_timeout_secs))
            .build()?;

        info!("Azure OpenAI client initialized for deployment '{}'", config.deployment);

        Ok(Self {
            client,
            config,
            temperature: pipeline.temperature,
            max_tokens: pipeline.max_tokens,
            prompt_template: pipeline.prompt_template.clone(),
        })
    }

    fn url(&self) -> String {
        completions_url(&self.config)
    }
}

fn completions_url(config: &AzureOpenAiConfig) -> String {
    format!(
        "{}/openai/deployments/{}/chat/completions?api-version={}",
        config.endpoint.trim_end_matches('/'),
        config.deployment,
        config.api_version
    )
}

fn request_body<'a>(prompt: &'a str, temperature: f32, max_tokens: u32) -> ChatRequest<'a> {
    ChatRequest {
        messages: vec![
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT,
            },
            ChatMessage {
                role: "user",
                content: prompt,
            },
        ],
        temperature,
        max_tokens,
    }
}

fn summary_from_response(response: ChatResponse) -> Result<String, SummarizeError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(SummarizeError::EmptyResponse)
}

impl Summarizer for AzureOpenAiSummarizer {
    fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        info!("Generating summary using Azure OpenAI...");

        let prompt = build_prompt(text, self.prompt_template.as_deref());
        let body = request_body(&prompt, self.temperature, self.max_tokens);

        let response = self
            .client
            .post(self.url())
            .header("api-key", &self.config.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            error!("Summarization failed with HTTP {}", status);
            return Err(SummarizeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let summary = summary_from_response(response.json()?)?;
        info!(
            "Summary generation complete. Generated {} characters",
            summary.chars().count()
        );
        Ok(summary)
    }
}
