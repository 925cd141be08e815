//! kactorctl (kactor) - CLI for actor services
//!
//! Scaffolds actor projects, builds their images and invokes running
//! instances over the invocation protocol.

use anyhow::Result;
use clap::Parser;

mod commands;
mod error;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Run the command
    if let Err(e) = cli.run().await {
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
