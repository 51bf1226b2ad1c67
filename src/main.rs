use anyhow::Result;
use clap::Parser;
use facegate::Opts;
use facegate::cli::SubCommandExtend;
use facegate::config::SubCommand;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let opts = Opts::parse();
    match &opts.subcmd {
        SubCommand::Server(cmd) => cmd.run(&opts).await,
        SubCommand::Verify(cmd) => cmd.run(&opts).await,
    }
}
