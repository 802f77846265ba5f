pub mod deepseek;
pub(crate) mod http_errors;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single chat completion attempt.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat API returned status {0}")]
    Status(StatusCode),

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    Unknown(String),
}
