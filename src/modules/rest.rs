// The `rest` module: raw access to the API client for any JSON resource on
// the server. Paths are relative to the base address.

use crate::api::is_success_status;
use crate::command::{factory, Arity, Command, CommandFactory, Module, ModuleSource};
use crate::context::Context;
use crate::outcome::CommandResult;
use anyhow::{Context as _, Result};
use serde_json::Value;

pub const NAME: &str = "rest";

pub fn register(source: &mut ModuleSource) {
    source.register(|| Ok(Box::new(RestModule) as Box<dyn Module>));
}

struct RestModule;

impl Module for RestModule {
    fn name(&self) -> &str {
        NAME
    }

    fn commands(&self) -> Vec<CommandFactory> {
        vec![
            factory::<Get>(),
            factory::<Post>(),
            factory::<Put>(),
            factory::<Delete>(),
        ]
    }
}

fn parse_body(text: &str) -> Result<Value> {
    serde_json::from_str(text).context("request body is not valid JSON")
}

fn pretty(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// `rest get <path>` lists, `rest get <path> <id>` fetches one object.
#[derive(Default)]
struct Get;

impl Command for Get {
    fn name(&self) -> &str {
        "get"
    }

    fn arity(&self) -> Arity {
        Arity::Any
    }

    fn run(&self, ctx: &mut Context, args: &[String]) -> Result<CommandResult> {
        let client = ctx.api_client()?;
        let response = match args {
            [path] => {
                let list = client.get_objects::<Value>(path)?;
                (list.result.map(Value::Array), list.status)
            }
            [path, id] => {
                let one = client.get_object::<Value>(path, id)?;
                (one.result, one.status)
            }
            _ => return Ok(CommandResult::invalid_argument("usage: rest get <path> [id]")),
        };

        match response {
            (Some(value), status) if is_success_status(status) => {
                Ok(CommandResult::success(pretty(&value)?))
            }
            (_, status) => Ok(CommandResult::http_error(status)),
        }
    }
}

/// `rest post <path> <json>`
#[derive(Default)]
struct Post;

impl Command for Post {
    fn name(&self) -> &str {
        "post"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn run(&self, ctx: &mut Context, args: &[String]) -> Result<CommandResult> {
        let body = parse_body(&args[1])?;
        let response = ctx.api_client()?.post_object(&args[0], &body)?;
        match response.result {
            Some(value) if response.is_success() => Ok(CommandResult::success(pretty(&value)?)),
            _ => Ok(CommandResult::http_error(response.status)),
        }
    }
}

/// `rest put <path> <id> <json>` prints the returned location, if any.
#[derive(Default)]
struct Put;

impl Command for Put {
    fn name(&self) -> &str {
        "put"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(3)
    }

    fn run(&self, ctx: &mut Context, args: &[String]) -> Result<CommandResult> {
        let body = parse_body(&args[2])?;
        let response = ctx.api_client()?.put_object(&args[0], &args[1], &body)?;
        if !response.is_success() {
            return Ok(CommandResult::http_error(response.status));
        }
        Ok(CommandResult::success(
            response
                .result
                .map(|location| location.to_string())
                .unwrap_or_default(),
        ))
    }
}

/// `rest delete <path> <id>`
#[derive(Default)]
struct Delete;

impl Command for Delete {
    fn name(&self) -> &str {
        "delete"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn run(&self, ctx: &mut Context, args: &[String]) -> Result<CommandResult> {
        let status = ctx.api_client()?.delete_object(&args[0], &args[1])?;
        if is_success_status(status) {
            return Ok(CommandResult::success(status.to_string()));
        }
        Ok(CommandResult::http_error(status))
    }
}
