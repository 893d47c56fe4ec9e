use anyhow::Result;
use clap::Parser;
use coffer::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
