use anyhow::Result;
use clap::Parser;

use authscan::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
