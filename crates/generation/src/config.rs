//! Generation client configuration

use std::time::Duration;

/// Default chat-completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.deepseek.com/chat/completions";

/// Default model name
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Default simulated latency in fallback mode
pub const DEFAULT_FALLBACK_DELAY: Duration = Duration::from_millis(1500);

/// How lines are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationMode {
    /// Call the remote chat-completions service
    Live,
    /// Answer from the built-in line set after a simulated delay
    #[default]
    Fallback,
}

/// Configuration for the generation client
#[derive(Clone)]
pub struct GenerationConfig {
    /// Generation mode
    pub mode: GenerationMode,
    /// Full chat-completions URL
    pub endpoint: String,
    /// Bearer token (required in live mode)
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling cutoff
    pub top_p: f32,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Simulated latency in fallback mode
    pub fallback_delay: Duration,
}

impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("mode", &self.mode)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("fallback_delay", &self.fallback_delay)
            .finish()
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            mode: GenerationMode::default(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 1.0,
            top_p: 0.95,
            timeout: Duration::from_secs(30),
            user_agent: format!("Pickup-Lines/{}", env!("CARGO_PKG_VERSION")),
            fallback_delay: DEFAULT_FALLBACK_DELAY,
        }
    }
}

impl GenerationConfig {
    /// Live configuration with an API key
    pub fn live(api_key: impl Into<String>) -> Self {
        Self { mode: GenerationMode::Live, api_key: Some(api_key.into()), ..Default::default() }
    }

    /// Fallback configuration
    pub fn fallback() -> Self {
        Self::default()
    }

    /// Set the endpoint URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the nucleus sampling cutoff
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the fallback delay
    pub fn with_fallback_delay(mut self, delay: Duration) -> Self {
        self.fallback_delay = delay;
        self
    }
}
