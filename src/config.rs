//! Session configuration
//!
//! Read once from the environment at startup and handed to the controller.

use std::path::PathBuf;
use std::time::Duration;

/// Value shipped in sample `.env` files; treated the same as no token.
pub const TOKEN_PLACEHOLDER: &str = "your_huggingface_token_here";

pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";
pub const DEFAULT_PROVIDER: &str = "novita";
pub const DEFAULT_ENDPOINT: &str = "https://router.huggingface.co/v1/chat/completions";

/// Delay between revealed characters of the simulated reply
pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(30);

/// Where replies come from for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Scripted reply, no network
    Simulated,
    /// Hugging Face inference with the configured token
    Live,
}

impl ResponseMode {
    /// Live iff a real (non-empty, non-placeholder) credential is present.
    pub fn from_credential(token: Option<&str>) -> Self {
        match token.map(str::trim) {
            Some(t) if !t.is_empty() && t != TOKEN_PLACEHOLDER => ResponseMode::Live,
            _ => ResponseMode::Simulated,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResponseMode::Simulated => "Simulated",
            ResponseMode::Live => "Live",
        }
    }
}

/// Configuration for a chat session
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub hf_token: Option<String>,
    pub model: String,
    pub provider: String,
    pub endpoint: String,
    pub reveal_interval: Duration,
    /// No timeout unless explicitly configured
    pub request_timeout: Option<Duration>,
    pub log_path: PathBuf,
    pub log_filter: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            hf_token: None,
            model: DEFAULT_MODEL.to_string(),
            provider: DEFAULT_PROVIDER.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            reveal_interval: DEFAULT_REVEAL_INTERVAL,
            request_timeout: None,
            log_path: std::env::temp_dir().join("timed-chat.log"),
            log_filter: "timed_chat=info".to_string(),
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            hf_token: get("HF_TOKEN").or_else(|| get("VITE_HF_TOKEN")),
            model: get("CHAT_MODEL").unwrap_or(defaults.model),
            provider: get("CHAT_PROVIDER").unwrap_or(defaults.provider),
            endpoint: get("CHAT_ENDPOINT").unwrap_or(defaults.endpoint),
            reveal_interval: defaults.reveal_interval,
            request_timeout: get("CHAT_REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            log_path: get("CHAT_LOG_PATH").map_or(defaults.log_path, PathBuf::from),
            log_filter: get("RUST_LOG").unwrap_or(defaults.log_filter),
        }
    }

    pub fn mode(&self) -> ResponseMode {
        ResponseMode::from_credential(self.hf_token.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_mode_from_credential() {
        assert_eq!(ResponseMode::from_credential(None), ResponseMode::Simulated);
        assert_eq!(ResponseMode::from_credential(Some("")), ResponseMode::Simulated);
        assert_eq!(ResponseMode::from_credential(Some("   ")), ResponseMode::Simulated);
        assert_eq!(
            ResponseMode::from_credential(Some(TOKEN_PLACEHOLDER)),
            ResponseMode::Simulated
        );
        assert_eq!(ResponseMode::from_credential(Some("hf_abc")), ResponseMode::Live);
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = ChatConfig::from_lookup(lookup(&[]));
        assert!(config.hf_token.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.provider, DEFAULT_PROVIDER);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.mode(), ResponseMode::Simulated);
    }

    #[test]
    fn test_token_fallback_to_vite_variable() {
        let config = ChatConfig::from_lookup(lookup(&[("VITE_HF_TOKEN", "hf_vite")]));
        assert_eq!(config.hf_token.as_deref(), Some("hf_vite"));
        assert_eq!(config.mode(), ResponseMode::Live);

        let config = ChatConfig::from_lookup(lookup(&[
            ("HF_TOKEN", "hf_primary"),
            ("VITE_HF_TOKEN", "hf_vite"),
        ]));
        assert_eq!(config.hf_token.as_deref(), Some("hf_primary"));
    }

    #[test]
    fn test_overrides() {
        let config = ChatConfig::from_lookup(lookup(&[
            ("CHAT_MODEL", "meta-llama/Llama-3.1-8B-Instruct"),
            ("CHAT_PROVIDER", "together"),
            ("CHAT_ENDPOINT", "http://localhost:9000/v1/chat/completions"),
            ("CHAT_REQUEST_TIMEOUT_SECS", "45"),
            ("CHAT_LOG_PATH", "/var/log/chat.log"),
        ]));
        assert_eq!(config.model, "meta-llama/Llama-3.1-8B-Instruct");
        assert_eq!(config.provider, "together");
        assert_eq!(config.endpoint, "http://localhost:9000/v1/chat/completions");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(45)));
        assert_eq!(config.log_path, PathBuf::from("/var/log/chat.log"));
    }

    #[test]
    fn test_invalid_timeout_ignored() {
        let config = ChatConfig::from_lookup(lookup(&[("CHAT_REQUEST_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.request_timeout, None);
        let config = ChatConfig::from_lookup(lookup(&[("CHAT_REQUEST_TIMEOUT_SECS", "0")]));
        assert_eq!(config.request_timeout, None);
    }
}
