// manigoal-core/src/config.rs

//! Configuration for the completion endpoint.
//!
//! Nothing here is process-global: callers build a [`CompanionConfig`] once
//! (from `Manigoal.toml` or the environment) and hand it to
//! [`crate::Companion::new`].

use crate::errors::CompanionError;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";
pub const DEFAULT_API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";
pub const BASE_URL_ENV_VAR: &str = "OPENROUTER_API_URL";
pub const MODEL_ENV_VAR: &str = "OPENROUTER_MODEL";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REFERER: &str = "https://github.com/maxwong/manigoal";
pub const DEFAULT_APP_TITLE: &str = "ManiGoal App";
pub const API_KEY_PREFIX: &str = "sk-or-v1-";

/// Sampling parameters sent with every completion request.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GenerationParameters {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub presence_penalty: f64,
    pub frequency_penalty: f64,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 400,
            top_p: 0.9,
            presence_penalty: 0.6,
            frequency_penalty: 0.6,
        }
    }
}

impl GenerationParameters {
    fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(anyhow!("'temperature' must be between 0 and 2, got {}.", self.temperature));
        }
        if !(0.0..=1.0).contains(&self.top_p) || self.top_p == 0.0 {
            return Err(anyhow!("'top_p' must be in (0, 1], got {}.", self.top_p));
        }
        if self.max_tokens == 0 {
            return Err(anyhow!("'max_tokens' must be positive."));
        }
        for (name, value) in [
            ("presence_penalty", self.presence_penalty),
            ("frequency_penalty", self.frequency_penalty),
        ] {
            if !(-2.0..=2.0).contains(&value) {
                return Err(anyhow!("'{}' must be between -2 and 2, got {}.", name, value));
            }
        }
        Ok(())
    }
}

/// The `[completion]` table of `Manigoal.toml`.
#[derive(Deserialize, Debug, Clone)]
pub struct CompletionSection {
    pub model_name: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_api_key_env_var")]
    pub api_key_env_var: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub referer: Option<String>,
    #[serde(default)]
    pub app_title: Option<String>,
    #[serde(default)]
    pub parameters: GenerationParameters,
}

fn default_api_key_env_var() -> String {
    DEFAULT_API_KEY_ENV_VAR.to_string()
}

#[derive(Deserialize, Debug, Clone)]
struct ConfigFile {
    completion: CompletionSection,
}

/// Everything needed to talk to the completion endpoint.
#[derive(Clone)]
pub struct CompanionConfig {
    pub model_name: String,
    pub base_url: String,
    api_key: String,
    pub timeout: Duration,
    pub referer: String,
    pub app_title: String,
    pub parameters: GenerationParameters,
}

impl fmt::Debug for CompanionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompanionConfig")
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// Rejects keys that are missing or not OpenRouter keys.
pub fn validate_api_key(api_key: &str) -> Result<(), CompanionError> {
    if api_key.trim().is_empty() {
        return Err(CompanionError::config("API key is empty."));
    }
    if !api_key.starts_with(API_KEY_PREFIX) {
        return Err(CompanionError::config(format!(
            "API key does not look like an OpenRouter key (expected prefix '{}').",
            API_KEY_PREFIX
        )));
    }
    Ok(())
}

fn validate_base_url(base_url: &str) -> Result<(), CompanionError> {
    let url = Url::parse(base_url)
        .map_err(|e| CompanionError::config(format!("Invalid base URL '{}': {}", base_url, e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(CompanionError::config(format!(
            "Base URL '{}' must use http or https.",
            base_url
        )));
    }
    Ok(())
}

impl CompanionConfig {
    /// Builds a config with default endpoint settings around a validated key.
    pub fn new(api_key: impl Into<String>) -> Result<Self, CompanionError> {
        let api_key = api_key.into();
        validate_api_key(&api_key)?;
        Ok(Self {
            model_name: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            referer: DEFAULT_REFERER.to_string(),
            app_title: DEFAULT_APP_TITLE.to_string(),
            parameters: GenerationParameters::default(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, CompanionError> {
        let base_url = base_url.into();
        validate_base_url(&base_url)?;
        self.base_url = base_url;
        Ok(self)
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Full URL of the chat completions route.
    pub fn completions_endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Builds a config from `OPENROUTER_API_KEY`, `OPENROUTER_API_URL` and `OPENROUTER_MODEL`.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    pub fn from_env_with(env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = env(DEFAULT_API_KEY_ENV_VAR).ok_or_else(|| {
            anyhow!(
                "Valid OpenRouter API key not found: set '{}'.",
                DEFAULT_API_KEY_ENV_VAR
            )
        })?;
        let mut config = Self::new(api_key).context("Invalid OpenRouter API key in environment")?;
        if let Some(base_url) = env(BASE_URL_ENV_VAR).filter(|u| !u.trim().is_empty()) {
            config = config
                .with_base_url(base_url)
                .context("Invalid OpenRouter base URL in environment")?;
        }
        if let Some(model) = env(MODEL_ENV_VAR).filter(|m| !m.trim().is_empty()) {
            config = config.with_model(model);
        }
        tracing::info!(base_url = %config.base_url, model = %config.model_name, "Built companion configuration from environment.");
        Ok(config)
    }

    /// Parses `Manigoal.toml` content, resolving the API key from the process environment.
    pub fn from_toml_str(config_toml_content: &str) -> Result<Self> {
        Self::from_toml_str_with_env(config_toml_content, |name| std::env::var(name).ok())
    }

    pub fn from_toml_str_with_env(
        config_toml_content: &str,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let file: ConfigFile = match toml::from_str(config_toml_content) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::error!(error = %e, "Failed to parse TOML content");
                return Err(anyhow!(e))
                    .context("Failed to parse configuration TOML content. Check TOML syntax.");
            }
        };
        let section = file.completion;

        // --- Basic Checks ---
        if section.model_name.trim().is_empty() {
            return Err(anyhow!("'completion.model_name' is empty."));
        }
        if section.api_key_env_var.trim().is_empty() {
            return Err(anyhow!("'completion.api_key_env_var' is empty."));
        }
        if section.timeout_secs == Some(0) {
            return Err(anyhow!("'completion.timeout_secs' must be positive."));
        }
        section
            .parameters
            .validate()
            .context("Invalid 'completion.parameters'")?;

        let api_key = env(&section.api_key_env_var).ok_or_else(|| {
            anyhow!(
                "Valid OpenRouter API key not found in environment variable '{}'.",
                section.api_key_env_var
            )
        })?;

        let mut config = Self::new(api_key)
            .with_context(|| format!("Invalid API key in '{}'", section.api_key_env_var))?
            .with_model(section.model_name);
        if let Some(base_url) = section.base_url {
            config = config
                .with_base_url(base_url)
                .context("Invalid 'completion.base_url'")?;
        }
        if let Some(secs) = section.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(referer) = section.referer {
            config.referer = referer;
        }
        if let Some(app_title) = section.app_title {
            config.app_title = app_title;
        }
        config.parameters = section.parameters;

        tracing::info!("Successfully parsed and validated companion configuration.");
        Ok(config)
    }
}
