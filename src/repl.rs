use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use tracing::{debug, info};

use crate::cleanup::strip_markdown;
use crate::config::Config;
use crate::model::complete;
use crate::model_gateway::ChatGateway;
use crate::prompt::{InteractiveInput, PromptSource, check_length, read_interactive};
use crate::spinner::StartSpinner;

/// Runs prompt → request → cleanup → print until the source is exhausted.
///
/// One-shot sources run exactly one iteration, even when the prompt is
/// rejected for length.
pub async fn run_session<G, R, W>(
    gateway: &G,
    cfg: &Config,
    source: &PromptSource,
    input: &mut R,
    out: &mut W,
    spinner: Option<StartSpinner<'_>>,
) -> Result<()>
where
    G: ChatGateway + ?Sized,
    R: BufRead,
    W: Write,
{
    loop {
        let prompt = match source {
            PromptSource::OneShot(text) => text.clone(),
            PromptSource::Interactive => {
                match read_interactive(input, out, cfg.max_input_length)
                    .context("Failed to read prompt from stdin")?
                {
                    InteractiveInput::Prompt(text) => text,
                    InteractiveInput::Blank => continue,
                    InteractiveInput::Quit => break,
                }
            }
        };

        match check_length(&prompt, cfg.max_input_length) {
            Ok(()) => run_turn(gateway, cfg, &prompt, out, spinner).await?,
            Err(err) => {
                info!(
                    limit = err.limit,
                    actual = err.actual,
                    "prompt rejected before sending"
                );
                writeln!(out, "{err}").context("Failed to write to stdout")?;
            }
        }

        if source.is_one_shot() {
            break;
        }
    }

    Ok(())
}

async fn run_turn<G, W>(
    gateway: &G,
    cfg: &Config,
    prompt: &str,
    out: &mut W,
    spinner: Option<StartSpinner<'_>>,
) -> Result<()>
where
    G: ChatGateway + ?Sized,
    W: Write,
{
    // Diagnostics are held back until the spinner has cleared its line.
    let mut diagnostics = Vec::new();
    let spinner = spinner.map(|start| start());
    let reply = complete(gateway, prompt, &mut diagnostics).await;
    if let Some(spinner) = spinner {
        spinner.stop().await;
    }
    let reply = reply.context("Failed to buffer diagnostics")?;
    out.write_all(&diagnostics)
        .context("Failed to write to stdout")?;

    let reply_chars = reply.chars().count();
    debug!(reply_chars, "rendering reply");
    if reply_chars > cfg.max_output_tokens {
        writeln!(
            out,
            "Warning (警告): the reply is {reply_chars} characters, over the maxOutputTokens limit of {}.",
            cfg.max_output_tokens
        )
        .context("Failed to write to stdout")?;
    }

    writeln!(out, "Processed reply:").context("Failed to write to stdout")?;
    writeln!(out, "{}", strip_markdown(&reply)).context("Failed to write to stdout")?;
    out.flush().context("Failed to flush stdout")?;
    Ok(())
}
