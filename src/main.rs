use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match deepseek_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
