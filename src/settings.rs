//! Runtime configuration read from the environment (and `.env`, if present).

use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::contexts::DEFAULT_CACHE_DIR;

pub const DEFAULT_TOGETHER_BASE_URL: &str = "https://api.together.xyz/v1";
pub const DEFAULT_HUGGINGFACE_BASE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Values shipped in the sample `.env` that mean "not configured"
const PLACEHOLDER_VALUES: &[&str] = &["votre-cle", "your-key", "changeme"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub together_api_key: Option<String>,
    pub huggingface_token: Option<String>,
    pub together_base_url: String,
    pub huggingface_base_url: String,
    pub request_timeout: Duration,
    pub cache_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            together_api_key: None,
            huggingface_token: None,
            together_base_url: DEFAULT_TOGETHER_BASE_URL.to_string(),
            huggingface_base_url: DEFAULT_HUGGINGFACE_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
        }
    }
}

impl Settings {
    /// Loads `.env` from the working directory, then reads the process environment.
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => debug!("Ignoring unreadable .env: {}", e),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup. Unset, empty, and placeholder
    /// values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let request_timeout = value("AI_TEAM_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        Self {
            together_api_key: value("TOGETHER_AI_API_KEY").filter(|v| !is_placeholder(v)),
            huggingface_token: value("HUGGINGFACE_TOKEN").filter(|v| !is_placeholder(v)),
            together_base_url: value("TOGETHER_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.together_base_url),
            huggingface_base_url: value("HUGGINGFACE_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.huggingface_base_url),
            request_timeout,
            cache_dir: value("AI_TEAM_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
        }
    }
}

fn is_placeholder(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    PLACEHOLDER_VALUES.iter().any(|p| lower.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(settings(&[]), Settings::default());
        assert_eq!(Settings::default().request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_placeholders_count_as_unset() {
        let s = settings(&[
            ("TOGETHER_AI_API_KEY", "votre-cle-together"),
            ("HUGGINGFACE_TOKEN", "   "),
        ]);
        assert_eq!(s.together_api_key, None);
        assert_eq!(s.huggingface_token, None);
    }

    #[test]
    fn test_overrides() {
        let s = settings(&[
            ("TOGETHER_AI_API_KEY", " tg-123 "),
            ("TOGETHER_BASE_URL", "http://localhost:8080/v1/"),
            ("AI_TEAM_TIMEOUT_SECS", "5"),
            ("AI_TEAM_CACHE_DIR", "/tmp/ai-cache"),
        ]);
        assert_eq!(s.together_api_key.as_deref(), Some("tg-123"));
        assert_eq!(s.together_base_url, "http://localhost:8080/v1");
        assert_eq!(s.request_timeout, Duration::from_secs(5));
        assert_eq!(s.cache_dir, PathBuf::from("/tmp/ai-cache"));
    }

    #[test]
    fn test_invalid_timeout_uses_default() {
        assert_eq!(settings(&[("AI_TEAM_TIMEOUT_SECS", "soon")]).request_timeout, Duration::from_secs(60));
        assert_eq!(settings(&[("AI_TEAM_TIMEOUT_SECS", "0")]).request_timeout, Duration::from_secs(60));
    }
}
