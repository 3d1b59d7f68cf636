use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Request};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::NarrativeConfig;
use crate::services::narrative_api::NarrativeApi;
use saenggibu_analyzer::fetch::auth::ApiKey;
use saenggibu_analyzer::fetch::{BasicClient, HttpClient};

const API_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

pub struct AnthropicClient<C = ApiKey<BasicClient>> {
    config: NarrativeConfig,
    http: C,
}

impl AnthropicClient {
    pub fn new(config: NarrativeConfig) -> Result<Self> {
        let http = ApiKey::new(BasicClient::new()?, "x-api-key", &config.api_key)?;
        Ok(Self { config, http })
    }
}

impl<C: HttpClient> AnthropicClient<C> {
    fn build_request(&self, summary: &str) -> Result<Request> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: &self.config.system,
            messages: [Message {
                role: "user",
                content: summary,
            }],
        };

        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));
        let mut req = Request::new(Method::POST, url.parse()?);
        req.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        req.headers_mut()
            .insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        *req.body_mut() = Some(serde_json::to_vec(&body)?.into());
        Ok(req)
    }
}

/// Joins the text blocks of a Messages API response.
fn collect_text(body: &str) -> Result<String> {
    let response: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| anyhow!("Failed to parse narrative response: {}", e))?;

    let text: Vec<String> = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();

    if text.is_empty() {
        return Err(anyhow!("Narrative response contained no text"));
    }
    Ok(text.join("\n"))
}

#[async_trait]
impl<C: HttpClient> NarrativeApi for AnthropicClient<C> {
    async fn generate(&self, summary: &str) -> Result<String> {
        let req = self.build_request(summary)?;

        info!(
            model = %self.config.model,
            summary_chars = summary.chars().count(),
            "Requesting narrative"
        );
        let response = self
            .http
            .execute(req)
            .await
            .map_err(|e| anyhow!("Failed to send narrative request: {}", e))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(anyhow!("Narrative API returned status {}: {}", status, body));
        }

        let text = collect_text(&body)?;
        debug!(chars = text.chars().count(), "Narrative received");
        Ok(text)
    }
}
