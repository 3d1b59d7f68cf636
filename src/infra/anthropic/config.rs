use anyhow::{Context, Result};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";
const DEFAULT_MAX_TOKENS: u32 = 4000;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_SYSTEM: &str = "당신은 학생 데이터를 분석하는 전문가입니다. 객관적인 데이터를 기반으로 \
학생의 강점을 발견하고 약점을 보완하는 방향으로 발전 가능성을 제시해주세요.";

/// Settings for one narrative request, passed explicitly to
/// [`AnthropicClient::new`](super::AnthropicClient::new).
#[derive(Clone)]
pub struct NarrativeConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system: String,
}

impl std::fmt::Debug for NarrativeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl NarrativeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            system: DEFAULT_SYSTEM.to_string(),
        }
    }

    /// Reads `ANTHROPIC_API_KEY` (required), `ANTHROPIC_MODEL` and
    /// `ANTHROPIC_BASE_URL` from the environment.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .context("ANTHROPIC_API_KEY must be set to request a narrative")?;
        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("ANTHROPIC_MODEL") {
            config.model = model;
        }
        if let Ok(base_url) = std::env::var("ANTHROPIC_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }
}
