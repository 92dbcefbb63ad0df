// Command and module capabilities.
//
// Modules register themselves into a [`ModuleSource`] by handing over a
// factory. The registry instantiates every module once, then every command
// the module lists. Factories may fail; the registry logs and skips those.

use crate::context::Context;
use crate::outcome::CommandResult;
use std::fmt;

/// How many arguments a command takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments.
    Exact(usize),
    /// Any number, including none.
    Any,
}

impl Arity {
    /// Map a declared count onto an arity: `-1` means any, negative values
    /// below that are invalid.
    pub fn from_count(count: i64) -> Option<Self> {
        match count {
            -1 => Some(Arity::Any),
            n if n >= 0 => usize::try_from(n).ok().map(Arity::Exact),
            _ => None,
        }
    }

    pub fn accepts(&self, given: usize) -> bool {
        match self {
            Arity::Exact(n) => *n == given,
            Arity::Any => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::Any => f.write_str("-1"),
        }
    }
}

/// A named operation inside a module.
pub trait Command {
    /// Name, unique within the module.
    fn name(&self) -> &str;

    fn arity(&self) -> Arity;

    /// Run with the arguments that follow the command name. The dispatcher
    /// has already checked the arity. An `Err` is printed as an Error result.
    fn run(&self, ctx: &mut Context, args: &[String]) -> anyhow::Result<CommandResult>;
}

/// Creates one command instance.
pub type CommandFactory = Box<dyn Fn() -> anyhow::Result<Box<dyn Command>>>;

/// Creates one module instance.
pub type ModuleFactory = Box<dyn Fn() -> anyhow::Result<Box<dyn Module>>>;

/// A named group of commands.
pub trait Module {
    /// Name, unique across the registry.
    fn name(&self) -> &str;

    /// Factories for every command in the module.
    fn commands(&self) -> Vec<CommandFactory>;
}

/// Factory for a command type with a `Default` constructor.
pub fn factory<C>() -> CommandFactory
where
    C: Command + Default + 'static,
{
    Box::new(|| Ok::<_, anyhow::Error>(Box::new(C::default()) as Box<dyn Command>))
}

/// A set of module factories loaded together: the built-in modules, or the
/// modules described by one manifest file.
pub struct ModuleSource {
    name: String,
    factories: Vec<ModuleFactory>,
}

impl ModuleSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            factories: Vec::new(),
        }
    }

    /// Add a module factory. Modules call this from their `register` fn.
    pub fn register<F>(&mut self, factory: F)
    where
        F: Fn() -> anyhow::Result<Box<dyn Module>> + 'static,
    {
        self.factories.push(Box::new(factory));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn factories(&self) -> &[ModuleFactory] {
        &self.factories
    }
}

impl fmt::Debug for ModuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleSource")
            .field("name", &self.name)
            .field("modules", &self.factories.len())
            .finish()
    }
}
