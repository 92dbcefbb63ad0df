// Dispatcher: resolve a tokenized line, check arity, run, print.

use crate::command::Command;
use crate::context::Context;
use crate::outcome::CommandResult;
use crate::registry::Resolution;
use crate::tokenizer::parse_arguments;

/// Whether the prompt loop keeps going after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Tokenize and dispatch one raw line.
pub fn dispatch_line(ctx: &mut Context, line: &str) -> Flow {
    dispatch(ctx, &parse_arguments(line))
}

/// Dispatch an already tokenized line and print what happened.
pub fn dispatch(ctx: &mut Context, tokens: &[String]) -> Flow {
    let resolution = ctx.registry.resolve(tokens);
    match resolution {
        Resolution::Empty => {}
        Resolution::Exit => return Flow::Stop,
        Resolution::ModuleListing(module) => {
            if let Some(listing) = ctx.registry.module_listing(&module) {
                ctx.say(listing);
            }
        }
        Resolution::Command { command, args } => {
            let arity = command.arity();
            if arity.accepts(args.len()) {
                let result = invoke(ctx, command.as_ref(), args);
                ctx.say(result);
            } else {
                ctx.say(format!(
                    "wrong amount of argument: {} != {}",
                    args.len(),
                    arity
                ));
            }
        }
        Resolution::NotFound(name) => ctx.say(format!("command not found : {name}")),
    }
    Flow::Continue
}

/// Run a command, turning a returned error into an Error result.
pub fn invoke(ctx: &mut Context, command: &dyn Command, args: &[String]) -> CommandResult {
    match command.run(ctx, args) {
        Ok(result) => result,
        Err(e) => {
            tracing::debug!("command {} failed: {e:#}", command.name());
            CommandResult::from_error(&e)
        }
    }
}
