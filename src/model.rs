use std::io::{self, Write};
use tracing::debug;

use crate::model_gateway::ChatGateway;
use crate::providers::ChatError;
use crate::status;

fn failure_message(err: &ChatError) -> String {
    match err {
        ChatError::Status(code) => status::describe(code.as_u16()),
        ChatError::Network(detail) => format!("Network request failed (网络请求失败): {detail}"),
        ChatError::Unknown(detail) => format!("Unexpected error (发生未知错误): {detail}"),
    }
}

/// Asks the gateway for a reply to `prompt`.
///
/// Failures never escape: each one is written to `out` as a single
/// diagnostic line and the reply becomes an empty string.
pub async fn complete<G, W>(gateway: &G, prompt: &str, out: &mut W) -> io::Result<String>
where
    G: ChatGateway + ?Sized,
    W: Write,
{
    match gateway.chat(prompt).await {
        Ok(reply) => Ok(reply),
        Err(err) => {
            debug!(error = %err, "chat completion failed; treating reply as empty");
            writeln!(out, "{}", failure_message(&err))?;
            Ok(String::new())
        }
    }
}
