//! Generation client
//!
//! [`GenerationClient`] produces one line per call. In live mode it posts a
//! chat-completions request and returns the trimmed first choice; in
//! fallback mode it waits the configured delay and picks a built-in line.
//! Live calls are not retried.

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client as ReqwestClient;
use std::sync::Arc;

use app_platform::{RandomSource, ThreadRandom};
use storage::RecordStore;

use crate::api::{build_messages, ChatCompletionRequest, ChatCompletionResponse};
use crate::config::{GenerationConfig, GenerationMode};
use crate::error::{GenerationError, Result};
use crate::fallback;
use crate::history::GenerationHistory;

/// Anything that can produce a line for a category and tone
#[async_trait]
pub trait LineGenerator: Send + Sync {
    /// Generate one line
    async fn generate(&self, category: &str, tone: &str) -> Result<String>;
}

/// Client for the remote generation service, with an offline fallback
///
/// # Examples
/// ```
/// use generation::{GenerationClient, GenerationConfig, LineGenerator};
/// use std::sync::Arc;
/// use std::time::Duration;
/// use storage::MemoryRecordStore;
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let config = GenerationConfig::fallback().with_fallback_delay(Duration::ZERO);
///     let client = GenerationClient::new(config, Arc::new(MemoryRecordStore::new()))?;
///
///     let line = client.generate("nerdy", "playful").await?;
///     assert!(!line.is_empty());
///     Ok(())
/// }
/// ```
pub struct GenerationClient {
    http: ReqwestClient,
    config: GenerationConfig,
    history: GenerationHistory,
    rng: Mutex<Box<dyn RandomSource>>,
}

impl std::fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationClient").field("config", &self.config).finish_non_exhaustive()
    }
}

impl GenerationClient {
    /// Create a client
    ///
    /// Live mode requires an API key. `store` holds the per-category
    /// recent-generation lists.
    pub fn new(config: GenerationConfig, store: Arc<dyn RecordStore>) -> Result<Self> {
        if config.mode == GenerationMode::Live
            && config.api_key.as_deref().map_or(true, |key| key.trim().is_empty())
        {
            return Err(GenerationError::Config("live mode requires an API key".to_string()));
        }

        let http = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        tracing::info!(mode = ?config.mode, model = %config.model, "Generation client ready");

        Ok(Self {
            http,
            config,
            history: GenerationHistory::new(store),
            rng: Mutex::new(Box::new(ThreadRandom)),
        })
    }

    /// Replace the random source used by fallback mode
    pub fn with_random(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    /// Get the client configuration
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Recent-generation lists
    pub fn history(&self) -> &GenerationHistory {
        &self.history
    }

    /// Generate a line, dispatching on the configured mode
    pub async fn generate_line(&self, category: &str, tone: &str) -> Result<String> {
        match self.config.mode {
            GenerationMode::Live => self.generate_live(category, tone).await,
            GenerationMode::Fallback => Ok(self.generate_fallback(category).await),
        }
    }

    async fn generate_live(&self, category: &str, tone: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: build_messages(category, tone, &self.history.prompt_examples(category)),
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            stream: false,
        };

        let api_key = self.config.api_key.as_deref().unwrap_or_default();
        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(category, error = %e, "Generation request failed");
                GenerationError::Network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(category, status = status.as_u16(), "Generation service returned an error");
            return Err(GenerationError::Status { status: status.as_u16(), body });
        }

        let body = response.text().await?;
        let completion: ChatCompletionResponse = serde_json::from_str(&body)?;
        let text = completion.first_text().ok_or(GenerationError::EmptyResponse)?.to_string();

        self.history.remember(category, &text);
        tracing::info!(category, tone, chars = text.len(), "Generated line");
        Ok(text)
    }

    async fn generate_fallback(&self, category: &str) -> String {
        if fallback::lines_for(category).is_none() {
            tracing::warn!(
                category,
                default = fallback::DEFAULT_FALLBACK_CATEGORY,
                "No built-in lines for category, using default"
            );
        }

        tokio::time::sleep(self.config.fallback_delay).await;

        let mut rng = self.rng.lock();
        fallback::pick(category, &mut **rng).to_string()
    }
}

#[async_trait]
impl LineGenerator for GenerationClient {
    async fn generate(&self, category: &str, tone: &str) -> Result<String> {
        self.generate_line(category, tone).await
    }
}
