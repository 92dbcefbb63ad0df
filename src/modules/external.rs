// External modules described by TOML manifests.
//
// A manifest names a module and lists its commands. Each command runs a
// program as a child process; its stdout becomes the result message.
//
// ```toml
// name = "tools"
//
// [[commands]]
// name = "uptime"
// arguments = 0       # -1 accepts any number
// program = "uptime"
// args = []           # passed before the user's arguments
// ```

use crate::command::{Arity, Command, CommandFactory, Module, ModuleSource};
use crate::context::Context;
use crate::error::ClientError;
use crate::outcome::CommandResult;
use crate::registry::LoadReport;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::process;

/// Parsed manifest file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    pub name: String,
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
}

/// One `[[commands]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandSpec {
    pub name: String,
    #[serde(default = "any_arguments")]
    pub arguments: i64,
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

fn any_arguments() -> i64 {
    -1
}

impl Manifest {
    pub fn parse(content: &str, origin: &Path) -> Result<Self, ClientError> {
        let manifest: Manifest = toml::from_str(content)
            .map_err(|e| ClientError::manifest(origin.display().to_string(), e.to_string()))?;
        if manifest.name.trim().is_empty() {
            return Err(ClientError::manifest(
                origin.display().to_string(),
                "module name is empty",
            ));
        }
        Ok(manifest)
    }

    pub fn from_file(path: &Path) -> Result<Self, ClientError> {
        let content =
            fs::read_to_string(path).map_err(|e| ClientError::io(path.display().to_string(), e))?;
        Self::parse(&content, path)
    }

    /// A module source holding this manifest's single module.
    pub fn into_source(self, origin: &Path) -> ModuleSource {
        let mut source = ModuleSource::new(origin.display().to_string());
        source.register(move || {
            Ok(Box::new(ExternalModule {
                manifest: self.clone(),
            }) as Box<dyn Module>)
        });
        source
    }
}

/// Read the manifest at `path` and add its module to the registry.
pub fn load_into(ctx: &mut Context, path: &Path) -> Result<LoadReport> {
    let manifest = Manifest::from_file(path)?;
    tracing::info!("loading module {} from {}", manifest.name, path.display());
    Ok(ctx.registry.load([manifest.into_source(path)]))
}

struct ExternalModule {
    manifest: Manifest,
}

impl Module for ExternalModule {
    fn name(&self) -> &str {
        &self.manifest.name
    }

    fn commands(&self) -> Vec<CommandFactory> {
        self.manifest
            .commands
            .iter()
            .cloned()
            .map(|spec| {
                Box::new(move || {
                    ExternalCommand::new(spec.clone()).map(|c| Box::new(c) as Box<dyn Command>)
                }) as CommandFactory
            })
            .collect()
    }
}

struct ExternalCommand {
    spec: CommandSpec,
    arity: Arity,
}

impl ExternalCommand {
    fn new(spec: CommandSpec) -> Result<Self> {
        if spec.name.trim().is_empty() {
            return Err(anyhow!("command with program '{}' has no name", spec.program));
        }
        if spec.program.trim().is_empty() {
            return Err(anyhow!("command {} has no program", spec.name));
        }
        let arity = Arity::from_count(spec.arguments).ok_or_else(|| {
            anyhow!(
                "command {} has invalid argument count {}",
                spec.name,
                spec.arguments
            )
        })?;
        Ok(Self { spec, arity })
    }
}

impl Command for ExternalCommand {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn arity(&self) -> Arity {
        self.arity
    }

    fn run(&self, _ctx: &mut Context, args: &[String]) -> Result<CommandResult> {
        tracing::debug!("spawning {} {:?} {:?}", self.spec.program, self.spec.args, args);
        let output = process::Command::new(&self.spec.program)
            .args(&self.spec.args)
            .args(args)
            .output()
            .map_err(|e| ClientError::io(self.spec.program.clone(), e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        if output.status.success() {
            return Ok(CommandResult::success(stdout));
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
        if stderr.is_empty() {
            return Ok(CommandResult::error(format!(
                "{} exited with {}",
                self.spec.program, output.status
            )));
        }
        Ok(CommandResult::error(stderr))
    }
}
