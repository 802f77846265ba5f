use std::error::Error as StdError;
use std::io::ErrorKind;

use super::ChatError;

fn error_chain_matches(
    err: &(dyn StdError + 'static),
    kind: ErrorKind,
    needle: &str,
) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(source) = current {
        if let Some(io_err) = source.downcast_ref::<std::io::Error>()
            && io_err.kind() == kind
        {
            return true;
        }

        if source.to_string().to_ascii_lowercase().contains(needle) {
            return true;
        }

        current = source.source();
    }

    false
}

fn error_chain_has_connection_refused(err: &(dyn StdError + 'static)) -> bool {
    error_chain_matches(err, ErrorKind::ConnectionRefused, "connection refused")
}

fn error_chain_has_timeout(err: &(dyn StdError + 'static)) -> bool {
    error_chain_matches(err, ErrorKind::TimedOut, "timed out")
}

/// Sorts a reqwest failure into the network or unknown class.
pub(crate) fn chat_request_error(err: reqwest::Error, api_url: &str) -> ChatError {
    if err.is_timeout() || error_chain_has_timeout(&err) {
        return ChatError::Network(format!("request to '{api_url}' timed out"));
    }

    if err.is_connect() {
        if error_chain_has_connection_refused(&err) {
            return ChatError::Network(format!("connection refused by '{api_url}'"));
        }
        return ChatError::Network(format!(
            "failed to connect to '{api_url}'; check network connectivity"
        ));
    }

    if err.is_request() || err.is_body() {
        return ChatError::Network(format!("request to '{api_url}' failed: {err}"));
    }

    ChatError::Unknown(format!("call to '{api_url}' failed: {err}"))
}
