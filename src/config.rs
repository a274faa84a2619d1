use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use thiserror::Error;

use crate::locale::Language;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";
const DEFAULT_TOKEN_LOCATION: &str = "./data/token";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config line {line}: {content}")]
    Syntax { line: usize, content: String },
    #[error("invalid value for {key}: {value} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// `KEY=value` pairs from an env-style file.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::Syntax {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// File value first, then the environment.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.get(key)
            .or_else(|| env::var(key).ok())
            .filter(|value| !value.trim().is_empty())
    }
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub timezone: Tz,
    pub language: Language,
    pub token_location: PathBuf,
    pub request_timeout: Duration,
}

impl Settings {
    pub fn resolve(config: &AppConfig) -> Result<Self, ConfigError> {
        Self::resolve_with(|key| config.lookup(key))
    }

    pub fn resolve_with<F: Fn(&str) -> Option<String>>(get_prop: F) -> Result<Self, ConfigError> {
        let api_url = get_prop("CLINIC_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let tz_name = get_prop("CLINIC_TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone = tz_name.parse::<Tz>().map_err(|reason| ConfigError::Invalid {
            key: "CLINIC_TIMEZONE",
            value: tz_name.clone(),
            reason: reason.to_string(),
        })?;

        let language = match get_prop("CLINIC_LANGUAGE") {
            Some(value) => value.parse::<Language>().map_err(|reason| ConfigError::Invalid {
                key: "CLINIC_LANGUAGE",
                value: value.clone(),
                reason,
            })?,
            None => Language::default(),
        };

        let token_location = get_prop("TOKEN_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_LOCATION));

        let request_timeout = match get_prop("REQUEST_TIMEOUT_SECS") {
            Some(value) => {
                let secs = value.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    key: "REQUEST_TIMEOUT_SECS",
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_url,
            timezone,
            language,
            token_location,
            request_timeout,
        })
    }
}
