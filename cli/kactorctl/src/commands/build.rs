//! Image build and publish.

use anyhow::Result;
use clap::Args;
use tokio::process::Command;

use crate::error::CliError;

/// Image prefix of images loaded into a local kind cluster.
const KIND_PREFIX: &str = "kind.local/";

#[derive(Debug, Args)]
pub struct BuildCommand {
    /// Container image name.
    #[arg(long)]
    image: String,

    /// Attempt to push the image.
    #[arg(long)]
    push: bool,

    /// Kind cluster name for "kind.local" images.
    #[arg(long, default_value = "knative")]
    kind: String,
}

impl BuildCommand {
    pub async fn run(self) -> Result<()> {
        for argv in self.plan() {
            run_command(&argv).await?;
        }

        if self.push {
            println!("Actor image created and published.");
        } else {
            println!("Actor image created.");
        }
        Ok(())
    }

    /// Command lines to run, in order.
    fn plan(&self) -> Vec<Vec<String>> {
        let mut plan = vec![argv(&["docker", "build", "-t", &self.image, "."])];

        if self.push {
            if self.image.starts_with(KIND_PREFIX) {
                plan.push(argv(&[
                    "kind",
                    "load",
                    "docker-image",
                    &self.image,
                    "--name",
                    &self.kind,
                ]));
            } else {
                plan.push(argv(&["docker", "push", &self.image]));
            }
        }

        plan
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

/// Echo and run a command with inherited stdio.
async fn run_command(argv: &[String]) -> Result<(), CliError> {
    let line = argv.join(" ");
    println!("{line}");

    let (program, args) = argv.split_first().ok_or_else(|| CliError::CommandFailed {
        command: line.clone(),
        status: "no program".to_string(),
    })?;

    let status = Command::new(program)
        .args(args)
        .status()
        .await
        .map_err(|source| CliError::CommandSpawn {
            command: line.clone(),
            source,
        })?;

    if !status.success() {
        return Err(CliError::CommandFailed {
            command: line,
            status: status.to_string(),
        });
    }
    Ok(())
}
