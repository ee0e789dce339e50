//! Process configuration, read once from the environment at startup.

use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a highly skilled coding assistant. \
Provide direct, code-focused answers to the user's queries. Keep your responses concise \
and to the point, including only the necessary code or explanation required to solve the \
problem. Do not provide extra commentary or unrelated details unless the user specifically \
asks for further explanation.";

const REDACTED: &str = "[REDACTED]";

/// Provider credential. Never printed by `Debug`.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Replace every occurrence of the key in `text`.
    pub fn redact(&self, text: &str) -> String {
        if self.0.is_empty() {
            return text.to_string();
        }
        text.replace(&self.0, REDACTED)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

impl AllowedOrigins {
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::List(origins)
        }
    }
}

/// Fixed parameters of every completion call.
#[derive(Clone, Debug)]
pub struct ChatSettings {
    pub model: String,
    pub temperature: f32,
    pub system_prompt: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: ApiKey,
    pub port: u16,
    pub allowed_origins: AllowedOrigins,
    pub debug: bool,
    pub base_url: String,
    pub upstream_timeout: Duration,
    pub chat: ChatSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        let port = match lookup("PORT") {
            Some(raw) => parse_var("PORT", &raw)?,
            None => DEFAULT_PORT,
        };

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|raw| AllowedOrigins::parse(&raw))
            .unwrap_or(AllowedOrigins::Any);

        let debug = lookup("DEBUG").map(|raw| parse_flag(&raw)).unwrap_or(false);

        let model = lookup("OPENAI_MODEL")
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let temperature = match lookup("OPENAI_TEMPERATURE") {
            Some(raw) => {
                let t: f32 = parse_var("OPENAI_TEMPERATURE", &raw)?;
                if !(0.0..=2.0).contains(&t) {
                    return Err(ConfigError::Invalid {
                        name: "OPENAI_TEMPERATURE",
                        value: raw,
                        reason: "must be between 0.0 and 2.0".to_string(),
                    });
                }
                t
            }
            None => DEFAULT_TEMPERATURE,
        };

        let base_url = lookup("OPENAI_BASE_URL")
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        // An explicitly empty SYSTEM_PROMPT disables the system turn.
        let system_prompt = match lookup("SYSTEM_PROMPT") {
            Some(p) if p.trim().is_empty() => None,
            Some(p) => Some(p),
            None => Some(DEFAULT_SYSTEM_PROMPT.to_string()),
        };

        let timeout_secs = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = parse_var("UPSTREAM_TIMEOUT_SECS", &raw)?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        name: "UPSTREAM_TIMEOUT_SECS",
                        value: raw,
                        reason: "must be greater than zero".to_string(),
                    });
                }
                secs
            }
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key: ApiKey::new(api_key),
            port,
            allowed_origins,
            debug,
            base_url,
            upstream_timeout: Duration::from_secs(timeout_secs),
            chat: ChatSettings {
                model,
                temperature,
                system_prompt,
            },
        })
    }
}

fn parse_var<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn missing_key_is_a_startup_error() {
        let err = config_from(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OPENAI_API_KEY")));

        let err = config_from(&[("OPENAI_API_KEY", "   ")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OPENAI_API_KEY")));
    }

    #[test]
    fn defaults_apply() {
        let cfg = config_from(&[("OPENAI_API_KEY", "sk-abc")]).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.allowed_origins, AllowedOrigins::Any);
        assert!(!cfg.debug);
        assert_eq!(cfg.chat.model, "gpt-4o");
        assert_eq!(cfg.chat.temperature, 0.7);
        assert_eq!(cfg.chat.system_prompt.as_deref(), Some(DEFAULT_SYSTEM_PROMPT));
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.upstream_timeout, Duration::from_secs(30));
    }

    #[test]
    fn overrides_are_read() {
        let cfg = config_from(&[
            ("OPENAI_API_KEY", "sk-abc"),
            ("PORT", "9090"),
            ("ALLOWED_ORIGINS", "http://localhost:3000, https://app.example.com"),
            ("DEBUG", "True"),
            ("OPENAI_BASE_URL", "http://127.0.0.1:1234/v1/"),
            ("SYSTEM_PROMPT", ""),
            ("UPSTREAM_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 9090);
        assert_eq!(
            cfg.allowed_origins,
            AllowedOrigins::List(vec![
                "http://localhost:3000".to_string(),
                "https://app.example.com".to_string(),
            ])
        );
        assert!(cfg.debug);
        assert_eq!(cfg.base_url, "http://127.0.0.1:1234/v1");
        assert!(cfg.chat.system_prompt.is_none());
        assert_eq!(cfg.upstream_timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = config_from(&[("OPENAI_API_KEY", "k"), ("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));

        let err =
            config_from(&[("OPENAI_API_KEY", "k"), ("OPENAI_TEMPERATURE", "3.5")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "OPENAI_TEMPERATURE", .. }));

        let err =
            config_from(&[("OPENAI_API_KEY", "k"), ("UPSTREAM_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "UPSTREAM_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn wildcard_anywhere_allows_all_origins() {
        assert_eq!(AllowedOrigins::parse("*"), AllowedOrigins::Any);
        assert_eq!(AllowedOrigins::parse(" , "), AllowedOrigins::Any);
        assert_eq!(AllowedOrigins::parse("http://a.test,*"), AllowedOrigins::Any);
    }

    #[test]
    fn api_key_is_masked_and_redacted() {
        let key = ApiKey::new("sk-live-123");
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
        assert_eq!(
            key.redact("Incorrect API key provided: sk-live-123."),
            "Incorrect API key provided: [REDACTED]."
        );
    }
}
