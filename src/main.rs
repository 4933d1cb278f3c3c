use anyhow::Result;
use clap::Parser;
use sales_analyzer::{Config, run, setup_logging};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    setup_logging(config.log_format)?;

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_ctrl_c(shutdown.clone()));

    run(&config, shutdown).await?;
    Ok(())
}

// Ctrl-C is the only stop signal for now; a failing signal handler stops the service right away
async fn wait_for_ctrl_c(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for ctrl-c");
    }
    shutdown.cancel();
}
