//! Completion configuration, built once at process start.
//!
//! All settings for the completion call live in [`CompletionConfig`]. It is
//! constructed during initialization (from the parameter store in the Lambda
//! binary, from flags in the CLI) and then handed to
//! [`crate::handler::MenuSuggester`]. Requests never read configuration from
//! anywhere else.

use crate::error::ConfigError;
use crate::parameters::ParameterStore;
use std::fmt;
use tracing::info;

/// Chat-completions endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Configuration for the completion call.
///
/// # Example
/// ```rust
/// use fitmymacros_pdfreader::CompletionConfig;
///
/// let config = CompletionConfig::builder()
///     .model("gpt-4o-mini")
///     .api_key("sk-test")
///     .temperature(0.2)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_tokens, 1024);
/// ```
#[derive(Clone)]
pub struct CompletionConfig {
    /// Full URL of the chat-completions endpoint.
    pub endpoint: String,

    /// Model identifier sent as `model`.
    pub model: String,

    /// Sampling temperature. Range: 0.0–2.0. Default: 0.7.
    pub temperature: f64,

    /// Maximum tokens the model may generate. Default: 1024.
    ///
    /// Five options with four macro fields each fit comfortably; a budget
    /// that is too small truncates the array before its closing `]`, which
    /// then fails sanitization.
    pub max_tokens: u32,

    /// Bearer credential. Never printed by `Debug`.
    pub api_key: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: String::new(),
            temperature: 0.7,
            max_tokens: 1024,
            api_key: String::new(),
        }
    }
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl CompletionConfig {
    /// Create a new builder for `CompletionConfig`.
    pub fn builder() -> CompletionConfigBuilder {
        CompletionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Fetch every setting from `store` and validate the result.
    ///
    /// This is the startup phase of the Lambda binary: any error here is
    /// fatal and the process must not start serving.
    pub async fn load<S>(store: &S, names: &ParameterNames) -> Result<Self, ConfigError>
    where
        S: ParameterStore + ?Sized,
    {
        let api_key = store.fetch(&names.api_key).await?;
        let model = store.fetch(&names.model).await?;

        let raw_temperature = store.fetch(&names.temperature).await?;
        let temperature = raw_temperature.trim().parse::<f64>().map_err(|_| {
            ConfigError::InvalidParameter {
                name: names.temperature.clone(),
                value: raw_temperature.clone(),
                expected: "a decimal number",
            }
        })?;

        let raw_max_tokens = store.fetch(&names.max_tokens).await?;
        let max_tokens = raw_max_tokens.trim().parse::<u32>().map_err(|_| {
            ConfigError::InvalidParameter {
                name: names.max_tokens.clone(),
                value: raw_max_tokens.clone(),
                expected: "an unsigned integer",
            }
        })?;

        let config = Self::builder()
            .model(model.trim())
            .api_key(api_key.trim())
            .temperature(temperature)
            .max_tokens(max_tokens)
            .build()?;

        info!(
            model = %config.model,
            temperature = config.temperature,
            max_tokens = config.max_tokens,
            "Completion configuration loaded"
        );
        Ok(config)
    }
}

/// Builder for [`CompletionConfig`].
#[derive(Debug)]
pub struct CompletionConfigBuilder {
    config: CompletionConfig,
}

impl CompletionConfigBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f64) -> Self {
        self.config.temperature = t;
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CompletionConfig, ConfigError> {
        let c = &self.config;
        if c.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint must not be empty".into()));
        }
        if c.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".into()));
        }
        if c.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid("API key must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&c.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature must be 0.0–2.0, got {}",
                c.temperature
            )));
        }
        if c.max_tokens == 0 {
            return Err(ConfigError::Invalid("max_tokens must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}

/// Names of the parameters that hold the completion settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterNames {
    pub api_key: String,
    pub model: String,
    pub temperature: String,
    pub max_tokens: String,
}

impl Default for ParameterNames {
    fn default() -> Self {
        Self {
            api_key: "OpenAI-API_Key_Encrypted".to_string(),
            model: "OpenAI-Model-PDF".to_string(),
            temperature: "OpenAI-Model-Temperature".to_string(),
            max_tokens: "OpenAI-Max-Tokens-pdf".to_string(),
        }
    }
}
