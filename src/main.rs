use clap::Parser;

use notification_service::cli::{self, Cli};
use notification_service::logger::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let environment = cli.environment();

    let settings = cli::load_and_merge_config(&cli).map_err(|e| {
        eprintln!("Configuration error: {e:#}");
        e
    })?;

    // Dry runs print to stdout only
    if !cli.is_dry_run() {
        init_logger(&settings.logger.to_logger_config()?)?;
    }

    cli::execute_command(&cli, settings, environment).await?;
    Ok(())
}
