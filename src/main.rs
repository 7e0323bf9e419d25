use clap::Parser;

use rss_archive::cli::Cli;
use rss_archive::util::Result;

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let cli = Cli::parse();
  cli.run().await
}
