// Command registry: module name → command name → command.
//
// Built at startup from the built-in module source and extended by
// `loadMDL`. Lookups never mutate; loading only ever adds modules.

use crate::command::{Command, Module, ModuleSource};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Module consulted when the first token is not a module name.
pub const UTILITY_MODULE: &str = "utility";

/// Input that stops the prompt loop, whatever modules are loaded.
pub const EXIT_COMMAND: &str = "exit";

type CommandTable = BTreeMap<String, Rc<dyn Command>>;

/// What a tokenized line refers to.
pub enum Resolution<'t> {
    /// Blank line.
    Empty,
    /// `exit`.
    Exit,
    /// A module name on its own; show its commands.
    ModuleListing(String),
    /// A command and the arguments that follow it.
    Command {
        command: Rc<dyn Command>,
        args: &'t [String],
    },
    /// Nothing matched. Holds the text shown after `command not found : `.
    NotFound(String),
}

impl fmt::Debug for Resolution<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Empty => f.write_str("Empty"),
            Resolution::Exit => f.write_str("Exit"),
            Resolution::ModuleListing(name) => f.debug_tuple("ModuleListing").field(name).finish(),
            Resolution::Command { command, args } => f
                .debug_struct("Command")
                .field("name", &command.name())
                .field("args", args)
                .finish(),
            Resolution::NotFound(text) => f.debug_tuple("NotFound").field(text).finish(),
        }
    }
}

/// Outcome of loading module sources, printed to the user.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Loaded modules with their command names, in load order.
    pub loaded: Vec<(String, Vec<String>)>,
    /// Modules skipped because the name was taken.
    pub duplicates: Vec<String>,
    /// Module or command factories that failed.
    pub failures: usize,
}

impl LoadReport {
    pub fn command_count(&self) -> usize {
        self.loaded.iter().map(|(_, commands)| commands.len()).sum()
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();
        for (module, commands) in &self.loaded {
            lines.push(format!("loaded {module}"));
            lines.extend(commands.iter().map(|c| format!("  {c}")));
        }
        lines.extend(self.duplicates.iter().map(|m| format!("{m} already loaded")));
        f.write_str(&lines.join("\n"))
    }
}

/// Two-level lookup table of commands.
#[derive(Default)]
pub struct Registry {
    modules: BTreeMap<String, CommandTable>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate every module in `sources` and add its commands.
    ///
    /// A module whose name is already loaded is skipped and reported. A
    /// module or command that fails to instantiate is logged and skipped;
    /// loading carries on with the rest.
    pub fn load<I>(&mut self, sources: I) -> LoadReport
    where
        I: IntoIterator<Item = ModuleSource>,
    {
        let mut report = LoadReport::default();
        for source in sources {
            tracing::debug!("loading modules from {}", source.name());
            for factory in source.factories() {
                match factory() {
                    Ok(module) => self.insert_module(module.as_ref(), &mut report),
                    Err(e) => {
                        tracing::warn!("module in {} failed to load: {e:#}", source.name());
                        report.failures += 1;
                    }
                }
            }
        }
        report
    }

    fn insert_module(&mut self, module: &dyn Module, report: &mut LoadReport) {
        let name = module.name().to_string();
        if self.modules.contains_key(&name) {
            tracing::warn!("module {name} already loaded, skipping");
            report.duplicates.push(name);
            return;
        }

        let mut table = CommandTable::new();
        let mut loaded = Vec::new();
        for factory in module.commands() {
            let command = match factory() {
                Ok(command) => command,
                Err(e) => {
                    tracing::warn!("command in module {name} failed to load: {e:#}");
                    report.failures += 1;
                    continue;
                }
            };
            let command_name = command.name().to_string();
            if table.contains_key(&command_name) {
                tracing::warn!("duplicate command {name} {command_name}, keeping the first");
                continue;
            }
            loaded.push(command_name.clone());
            table.insert(command_name, Rc::from(command));
        }

        tracing::info!("loaded module {name} with {} commands", table.len());
        self.modules.insert(name.clone(), table);
        report.loaded.push((name, loaded));
    }

    pub fn contains_module(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn command_names(&self, module: &str) -> Option<impl Iterator<Item = &str>> {
        self.modules
            .get(module)
            .map(|table| table.keys().map(String::as_str))
    }

    pub fn command(&self, module: &str, name: &str) -> Option<Rc<dyn Command>> {
        self.modules.get(module)?.get(name).cloned()
    }

    /// Work out what a tokenized line refers to.
    ///
    /// A first token naming a module makes the second token the command.
    /// Otherwise the first token is looked up in the utility module.
    pub fn resolve<'t>(&self, tokens: &'t [String]) -> Resolution<'t> {
        let Some(first) = tokens.first() else {
            return Resolution::Empty;
        };
        if first == EXIT_COMMAND {
            return Resolution::Exit;
        }

        if self.contains_module(first) {
            let Some(second) = tokens.get(1) else {
                return Resolution::ModuleListing(first.clone());
            };
            return match self.command(first, second) {
                Some(command) => Resolution::Command {
                    command,
                    args: &tokens[2..],
                },
                None => Resolution::NotFound(format!("{first} {second}")),
            };
        }

        match self.command(UTILITY_MODULE, first) {
            Some(command) => Resolution::Command {
                command,
                args: &tokens[1..],
            },
            None => Resolution::NotFound(first.clone()),
        }
    }

    /// One module and its commands, indented.
    pub fn module_listing(&self, module: &str) -> Option<String> {
        let commands = self.command_names(module)?;
        let mut lines = vec![module.to_string()];
        lines.extend(commands.map(|c| format!("  {c}")));
        Some(lines.join("\n"))
    }

    /// Every module and its commands.
    pub fn help_listing(&self) -> String {
        let mut lines = vec!["Modules:".to_string()];
        for (module, table) in &self.modules {
            lines.push(format!("  {module}"));
            lines.extend(table.keys().map(|c| format!("    {c}")));
        }
        lines.join("\n")
    }
}
