use anyhow::Result;
use clap::Parser;
use seller_ledger::cli::Cli;
use seller_ledger::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json);
    cli.run().await
}
