use clap::Parser;
use tokio::io::AsyncWriteExt;
use tracing_subscriber::EnvFilter;

use elter_validate::cli::Cli;
use elter_validate::error::ValidateError;
use elter_validate::{pipeline, report};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("elter-validate: {}: {e}", e.code());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ValidateError> {
    let config = cli.into_config()?;
    let results = pipeline::run(&config).await?;

    let out = if config.pretty {
        report::report_pretty(&results)
    } else {
        report::report(&results)
    }
    .map_err(|e| ValidateError::Internal(format!("cannot serialize results: {e}")))?;

    write_stdout(&out)
        .await
        .map_err(|e| ValidateError::Internal(format!("cannot write results: {e}")))
}

async fn write_stdout(out: &str) -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(out.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}
