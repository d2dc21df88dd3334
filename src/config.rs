use std::env;
use std::fmt;

pub const API_KEY_VAR: &str = "DEEPSEEK_API_KEY";

const DEFAULT_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "deepseek-chat";
const DEFAULT_SYSTEM_PROMPT: &str = "You are a technical support assistant. \
Answer strictly using the provided knowledge base.";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_KNOWLEDGE_BASE_PATH: &str = "knowledge_base.json";
const DEFAULT_EXIT_KEYWORD: &str = "выход";
const DEFAULT_ACCEPT_INVALID_CERTS: bool = false;

#[derive(Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub system_prompt: String,
    pub request_timeout_secs: u64,
    pub knowledge_base_path: String,
    pub exit_keyword: String,
    /// Disables TLS certificate verification. Only set through
    /// `DEEPSEEK_ACCEPT_INVALID_CERTS`.
    pub accept_invalid_certs: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("knowledge_base_path", &self.knowledge_base_path)
            .field("exit_keyword", &self.exit_keyword)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    fn from_env_with(mut get_var: impl FnMut(&str) -> Option<String>) -> Self {
        let api_key = get_var(API_KEY_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let request_timeout_secs =
            parse_request_timeout_secs(get_var("REQUEST_TIMEOUT_SECS").as_deref());
        let accept_invalid_certs = parse_bool(
            get_var("DEEPSEEK_ACCEPT_INVALID_CERTS").as_deref(),
            DEFAULT_ACCEPT_INVALID_CERTS,
        );
        let exit_keyword = parse_exit_keyword(get_var("EXIT_KEYWORD").as_deref());

        Self {
            api_key,
            api_url: get_var("DEEPSEEK_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            model: get_var("DEEPSEEK_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            system_prompt: get_var("SYSTEM_PROMPT")
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            request_timeout_secs,
            knowledge_base_path: get_var("KNOWLEDGE_BASE_PATH")
                .unwrap_or_else(|| DEFAULT_KNOWLEDGE_BASE_PATH.to_string()),
            exit_keyword,
            accept_invalid_certs,
        }
    }
}

fn parse_positive_u64(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

fn parse_request_timeout_secs(raw: Option<&str>) -> u64 {
    parse_positive_u64(raw, DEFAULT_REQUEST_TIMEOUT_SECS)
}

fn parse_bool(raw: Option<&str>, default: bool) -> bool {
    match raw.map(str::trim).map(str::to_ascii_lowercase).as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

fn parse_exit_keyword(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_EXIT_KEYWORD)
        .to_string()
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        api_key: Some("test-key".to_string()),
        api_url: "http://127.0.0.1:9/v1/chat/completions".to_string(),
        model: DEFAULT_MODEL.to_string(),
        system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        request_timeout_secs: 5,
        knowledge_base_path: DEFAULT_KNOWLEDGE_BASE_PATH.to_string(),
        exit_keyword: DEFAULT_EXIT_KEYWORD.to_string(),
        accept_invalid_certs: false,
    }
}
