//! Project scaffolding.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use crate::error::CliError;

const NODE_TEMPLATE: &[(&str, &str)] = &[
    ("package.json", include_str!("../../templates/node/package.json")),
    ("index.js", include_str!("../../templates/node/index.js")),
    ("Dockerfile", include_str!("../../templates/node/Dockerfile")),
];

#[derive(Debug, Args)]
pub struct CreateCommand {
    /// Actor runtime.
    #[arg(short, long)]
    runtime: String,

    /// Directory to write the project into.
    #[arg(long, default_value = ".")]
    dir: PathBuf,
}

impl CreateCommand {
    pub fn run(self) -> Result<()> {
        let files = template(&self.runtime)?;
        write_project(&self.dir, files)?;
        println!("Actor project created.");
        Ok(())
    }
}

/// Template files for a runtime.
fn template(runtime: &str) -> Result<&'static [(&'static str, &'static str)], CliError> {
    match runtime {
        "node" => Ok(NODE_TEMPLATE),
        other => Err(CliError::UnsupportedRuntime(other.to_string())),
    }
}

/// Write template files into `dir`, replacing existing ones.
fn write_project(dir: &Path, files: &[(&str, &str)]) -> Result<()> {
    for (name, contents) in files {
        println!("Writing {name}.");
        let path = dir.join(name);
        std::fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_runtime() {
        let err = template("python").unwrap_err();
        assert_eq!(err.to_string(), "the actor runtime 'python' is not supported");
    }

    #[test]
    fn test_node_project_files() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), template("node").unwrap()).unwrap();

        for name in ["package.json", "index.js", "Dockerfile"] {
            assert!(dir.path().join(name).is_file(), "missing {name}");
        }

        let package: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("package.json")).unwrap(),
        )
        .unwrap();
        assert!(package["dependencies"]["express"].is_string());

        let index = std::fs::read_to_string(dir.path().join("index.js")).unwrap();
        assert!(index.contains("/actor/v1/invoke/:id/:method"));
        assert!(index.contains("/actor/v1/deactivate/:id"));
        assert!(index.contains("'K-Session'"));
    }

    #[test]
    fn test_create_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(write_project(&missing, NODE_TEMPLATE).is_err());
    }
}
