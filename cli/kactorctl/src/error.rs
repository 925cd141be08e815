//! Error handling and display for the CLI.

use colored::Colorize;
use kactor_client::ClientError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("the actor runtime '{0}' is not supported")]
    UnsupportedRuntime(String),

    #[error("`{command}` exited with {status}")]
    CommandFailed { command: String, status: String },

    #[error("could not run `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    // Check for specific error types and provide hints
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        match cli_err {
            CliError::UnsupportedRuntime(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Supported runtimes: node.".yellow()
                );
            }
            CliError::CommandSpawn { .. } => {
                eprintln!(
                    "\n{}",
                    "Hint: Check that docker (and kind, for kind.local images) is on your PATH."
                        .yellow()
                );
            }
            CliError::Client(ClientError::Transport(_)) => {
                eprintln!(
                    "\n{}",
                    "Hint: Check the service is reachable, or pass --url to target it directly."
                        .yellow()
                );
            }
            _ => {}
        }
    }
}
