pub mod cleanup;
pub mod config;
pub mod logging;
pub mod model;
pub mod model_gateway;
pub mod prompt;
pub mod providers;
pub mod repl;
pub mod spinner;
pub mod status;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use reqwest::Client;
use std::env;
use std::io::{self, IsTerminal};
use tracing::info;

use config::{CONFIG_FILE_PATH, Config};
use model_gateway::HostChatGateway;
use prompt::PromptSource;
use repl::run_session;
use spinner::{Spinner, StartSpinner};

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = logging::init();

    let cfg = Config::load().with_context(|| {
        format!(
            "Unable to load configuration (无法加载配置文件); check that {CONFIG_FILE_PATH} exists, \
             is valid JSON, and has a non-empty apiKey"
        )
    })?;
    info!(
        model = %cfg.model,
        api_url = %cfg.api_url,
        max_input_length = cfg.max_input_length,
        max_output_tokens = cfg.max_output_tokens,
        "loaded runtime configuration"
    );

    let client = Client::builder()
        .build()
        .context("Failed to initialize HTTP client")?;
    let gateway = HostChatGateway::new(&client, &cfg);
    let source = PromptSource::from_args(env::args().skip(1));

    let mut input = io::stdin().lock();
    let mut out = io::stdout();
    let start_spinner: StartSpinner<'_> = &Spinner::start;
    let spinner = out.is_terminal().then_some(start_spinner);
    run_session(&gateway, &cfg, &source, &mut input, &mut out, spinner).await
}
