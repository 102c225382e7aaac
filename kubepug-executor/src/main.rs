use anyhow::Result;
use clap::Parser;
use kubepug_executor::{Cli, Commands};
use tracing_log::AsTrace;

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  tracing_subscriber::fmt()
    .with_max_level(cli.verbose.log_level_filter().as_trace())
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match &cli.commands {
    Commands::Run(args) => kubepug_executor::run(args, &cli.verbose).await?,
    Commands::Translate(args) => kubepug_executor::translate(args)?,
  }

  Ok(())
}
