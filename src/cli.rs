use clap::Parser;

use crate::{harvest::HarvestConfig, server::ServerConfig, util::Result};

#[derive(Parser)]
#[clap(version)]
pub struct Cli {
  #[clap(subcommand)]
  subcmd: SubCommand,
}

#[derive(Parser)]
enum SubCommand {
  /// Fetch all configured feeds and update the article archive
  Harvest(HarvestConfig),
  /// Serve the archive directory over HTTP
  Serve(ServerConfig),
}

impl Cli {
  pub async fn run(self) -> Result<()> {
    match self.subcmd {
      SubCommand::Harvest(config) => config.run().await,
      SubCommand::Serve(config) => crate::server::serve(config).await,
    }
  }
}
