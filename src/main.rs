use anyhow::Result;
use clap::Parser;
use voxtask::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    voxtask::init_logger();
    let cli = Cli::parse();
    voxtask::run(cli).await
}
