use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use planora_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

use super::{CommandResult, EXIT_CONFIG_FAILURE};

pub fn run() -> CommandResult {
    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => CommandResult { exit_code: 0, output: render(&config) },
        Err(error) => CommandResult::failure(
            "config",
            "config_validation",
            format!("config validation failed: {error}"),
            EXIT_CONFIG_FAILURE,
        ),
    }
}

/// One line per key with its effective value and where it came from.
pub fn render(config: &AppConfig) -> String {
    let sources = SourceLookup::detect();
    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    let llm_api_key = config
        .llm
        .api_key
        .as_ref()
        .map(|key| redact_token(key.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());
    let llm_base_url = match &config.llm.base_url {
        Some(base_url) => base_url.clone(),
        None => format!("{} (provider default)", config.llm.effective_base_url()),
    };

    let entries: [(&str, String, &[&str]); 14] = [
        ("llm.provider", format!("{:?}", config.llm.provider), &["PLANORA_LLM_PROVIDER"]),
        ("llm.model", config.llm.model.clone(), &["PLANORA_LLM_MODEL"]),
        ("llm.base_url", llm_base_url, &["PLANORA_LLM_BASE_URL"]),
        ("llm.api_key", llm_api_key, &["PLANORA_LLM_API_KEY", "GROQ_API_KEY"]),
        ("llm.timeout_secs", config.llm.timeout_secs.to_string(), &["PLANORA_LLM_TIMEOUT_SECS"]),
        ("llm.temperature", config.llm.temperature.to_string(), &["PLANORA_LLM_TEMPERATURE"]),
        ("llm.max_tokens", config.llm.max_tokens.to_string(), &["PLANORA_LLM_MAX_TOKENS"]),
        ("geocoder.base_url", config.geocoder.base_url.clone(), &["PLANORA_GEOCODER_BASE_URL"]),
        (
            "geocoder.user_agent",
            config.geocoder.user_agent.clone(),
            &["PLANORA_GEOCODER_USER_AGENT"],
        ),
        (
            "geocoder.timeout_secs",
            config.geocoder.timeout_secs.to_string(),
            &["PLANORA_GEOCODER_TIMEOUT_SECS"],
        ),
        (
            "server.bind_address",
            config.server.bind_address.clone(),
            &["PLANORA_SERVER_BIND_ADDRESS"],
        ),
        ("server.port", config.server.port.to_string(), &["PLANORA_SERVER_PORT"]),
        (
            "logging.level",
            config.logging.level.clone(),
            &["PLANORA_LOGGING_LEVEL", "PLANORA_LOG_LEVEL"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            &["PLANORA_LOGGING_FORMAT", "PLANORA_LOG_FORMAT"],
        ),
    ];

    for (key, value, env_keys) in entries {
        lines.push(render_line(key, &value, sources.field_source(key, env_keys)));
    }

    lines.join("\n")
}

struct SourceLookup {
    path: Option<PathBuf>,
    doc: Option<Value>,
}

impl SourceLookup {
    fn detect() -> Self {
        let path = detect_config_path();
        let doc = load_config_file_doc(path.as_deref());
        Self { path, doc }
    }

    fn field_source(&self, key_path: &str, env_keys: &[&str]) -> String {
        if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
            return format!("env ({env_key})");
        }

        if let Some(doc) = &self.doc {
            if contains_path(doc, key_path) {
                let file_path = self
                    .path
                    .as_deref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                return format!("file ({file_path})");
            }
        }

        "default".to_string()
    }
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("planora.toml"), PathBuf::from("config/planora.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once(['-', '_']) {
        return format!("{prefix}_***");
    }

    "<redacted>".to_string()
}

#[cfg(test)]
mod tests {
    use planora_core::config::AppConfig;
    use secrecy::SecretString;

    use super::{redact_token, render};

    #[test]
    fn tokens_keep_only_their_prefix() {
        assert_eq!(redact_token("gsk_abcdef123"), "gsk_***");
        assert_eq!(redact_token("sk-proj-abc"), "sk_***");
        assert_eq!(redact_token("plainsecret"), "<redacted>");
        assert_eq!(redact_token("  "), "<empty>");
    }

    #[test]
    fn rendered_config_never_contains_the_api_key() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some(SecretString::from("gsk_supersecret".to_string()));

        let output = render(&config);

        assert!(output.contains("- llm.api_key = gsk_***"));
        assert!(!output.contains("supersecret"));
        assert!(output.contains("https://api.groq.com/openai/v1 (provider default)"));
    }
}
