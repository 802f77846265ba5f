use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_PATH: &str = "config.json";

const DEFAULT_MAX_INPUT_LENGTH: usize = 500;
const DEFAULT_MAX_OUTPUT_TOKENS: usize = 1000;
const DEFAULT_MODEL: &str = "deepseek-chat";
const DEFAULT_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{}' does not contain a non-empty apiKey", .path.display())]
    MissingApiKey { path: PathBuf },
}

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub max_input_length: usize,
    pub max_output_tokens: usize,
    pub model: String,
    pub api_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("max_input_length", &self.max_input_length)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    api_key: Option<String>,
    max_input_length: Option<Value>,
    max_output_tokens: Option<Value>,
    model: Option<String>,
    api_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE_PATH)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw, path)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Self::parse(raw, Path::new(CONFIG_FILE_PATH))
    }

    fn parse(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        let parsed: RawConfig = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let api_key = parsed
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey {
                path: path.to_path_buf(),
            })?;

        Ok(Self {
            api_key,
            max_input_length: parse_positive_usize(
                parsed.max_input_length.as_ref(),
                DEFAULT_MAX_INPUT_LENGTH,
            ),
            max_output_tokens: parse_positive_usize(
                parsed.max_output_tokens.as_ref(),
                DEFAULT_MAX_OUTPUT_TOKENS,
            ),
            model: non_blank_or(parsed.model, DEFAULT_MODEL),
            api_url: non_blank_or(parsed.api_url, DEFAULT_API_URL),
        })
    }
}

fn parse_positive_usize(raw: Option<&Value>, default: usize) -> usize {
    let parsed = match raw {
        Some(Value::Number(number)) => number.as_u64(),
        Some(Value::String(text)) => text.trim().parse::<u64>().ok(),
        _ => None,
    };

    parsed
        .filter(|value| *value > 0)
        .and_then(|value| usize::try_from(value).ok())
        .unwrap_or(default)
}

fn non_blank_or(raw: Option<String>, default: &str) -> String {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}
