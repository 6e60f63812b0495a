use anyhow::{Context, Result};

use crate::llm_client::GatewayConfig;

/// Default OpenAI-compatible gateway. Any endpoint that speaks the
/// chat-completions protocol works; the API key and model come per request.
const DEFAULT_LLM_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Application configuration loaded from environment variables.
/// Every value has a default — the API key is supplied by callers per
/// request, never read from the server environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_base_url: String,
    pub app_referrer: String,
    pub app_title: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm_base_url: env_or("LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
            app_referrer: env_or("APP_REFERRER", "https://vitae.app"),
            app_title: env_or("APP_TITLE", "Vitae"),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    /// Gateway configuration template. The credential is filled in per
    /// request by the generation pipeline — see `GatewayConfig::with_api_key`.
    pub fn gateway_defaults(&self) -> GatewayConfig {
        GatewayConfig {
            base_url: self.llm_base_url.clone(),
            api_key: String::new(),
            referrer: self.app_referrer.clone(),
            app_title: self.app_title.clone(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
