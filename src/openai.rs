//! Minimal client for the OpenAI Responses API, restricted to the one call
//! this service makes: an answer produced with the hosted `web_search` tool.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum OpenAIError {
    #[error("Connection error: {0}")]
    Network(String),

    #[error("Error code: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// A citation exactly as the provider reported it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawCitation {
    pub index: u64,
    pub url: String,
}

/// The parts of a provider reply this service uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderAnswer {
    pub output_text: String,
    pub citations: Option<Vec<RawCitation>>,
}

/// Something that answers a query under a set of instructions, searching the
/// web as it sees fit.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    async fn answer(&self, query: &str, instructions: &str) -> Result<ProviderAnswer, OpenAIError>;
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    tools: [Tool; 1],
    input: &'a str,
    instructions: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
    #[serde(default)]
    citations: Option<Vec<RawCitation>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<ContentPart>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    OutputText {
        text: String,
        #[serde(default)]
        annotations: Vec<Annotation>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Annotation {
    UrlCitation { start_index: u64, url: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl From<ResponsesResponse> for ProviderAnswer {
    fn from(response: ResponsesResponse) -> Self {
        let mut output_text = String::new();
        let mut annotated = Vec::new();

        for item in response.output {
            let OutputItem::Message { content } = item else {
                continue;
            };
            for part in content {
                let ContentPart::OutputText { text, annotations } = part else {
                    continue;
                };
                output_text.push_str(&text);
                annotated.extend(annotations.into_iter().filter_map(|a| match a {
                    Annotation::UrlCitation { start_index, url } => Some(RawCitation {
                        index: start_index,
                        url,
                    }),
                    Annotation::Other => None,
                }));
            }
        }

        let citations = match response.citations {
            Some(explicit) => Some(explicit),
            None if annotated.is_empty() => None,
            None => Some(annotated),
        };

        ProviderAnswer {
            output_text,
            citations,
        }
    }
}

/// OpenAI client handle. Built once at startup and shared by every request.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAIClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, OpenAIError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| OpenAIError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, OpenAIError> {
        Self::new(
            &config.openai_api_key,
            &config.openai_base_url,
            &config.openai_model,
            config.upstream_timeout,
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl AnswerProvider for OpenAIClient {
    async fn answer(&self, query: &str, instructions: &str) -> Result<ProviderAnswer, OpenAIError> {
        let request = ResponsesRequest {
            model: &self.model,
            tools: [Tool { kind: "web_search" }],
            input: query,
            instructions,
        };

        debug!(model = %self.model, query, "Sending web search request");

        let response = self
            .http_client
            .post(format!("{}/responses", self.base_url))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI request failed");
                OpenAIError::Network(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OpenAIError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "OpenAI returned an error");
            return Err(api_error(status, &body));
        }

        let parsed: ResponsesResponse =
            serde_json::from_str(&body).map_err(|e| OpenAIError::Parse(e.to_string()))?;
        Ok(parsed.into())
    }
}

fn api_error(status: StatusCode, body: &str) -> OpenAIError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string());
    OpenAIError::Api {
        status: status.as_u16(),
        message,
    }
}
