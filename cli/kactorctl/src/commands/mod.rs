//! CLI commands.

mod build;
mod create;
mod invoke;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// kactor CLI - Create, build and invoke actor services.
#[derive(Debug, Parser)]
#[command(name = "kactor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create an actor project in the current directory.
    Create(create::CreateCommand),

    /// Build and optionally publish an actor image.
    Build(build::BuildCommand),

    /// Invoke a method on an actor instance.
    Invoke(invoke::InvokeCommand),

    /// Deactivate an actor instance, discarding its state.
    Deactivate(invoke::DeactivateCommand),

    /// Show CLI version.
    Version,
}

impl Cli {
    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Create(cmd) => cmd.run(),
            Commands::Build(cmd) => cmd.run().await,
            Commands::Invoke(cmd) => cmd.run().await,
            Commands::Deactivate(cmd) => cmd.run().await,
            Commands::Version => {
                println!("kactor {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}
