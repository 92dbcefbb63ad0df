// The `auth` module: manage the bearer token sent with every request.
//
//   auth token [value]   set the token (prompts, hidden, when no value)
//   auth show            print the JWT claims of the current token
//   auth clear [answer]  forget the token after a yes/no confirmation

use crate::command::{factory, Arity, Command, CommandFactory, Module, ModuleSource};
use crate::context::Context;
use crate::outcome::CommandResult;
use crate::ui;
use anyhow::Result;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

pub const NAME: &str = "auth";

const YES: &str = "y|yes";
const NO: &str = "n|no";

pub fn register(source: &mut ModuleSource) {
    source.register(|| Ok(Box::new(AuthModule) as Box<dyn Module>));
}

struct AuthModule;

impl Module for AuthModule {
    fn name(&self) -> &str {
        NAME
    }

    fn commands(&self) -> Vec<CommandFactory> {
        vec![
            factory::<SetToken>(),
            factory::<ShowClaims>(),
            factory::<ClearToken>(),
        ]
    }
}

/// Decode the claims (middle segment) of a JWT. Returns `None` when the
/// token is not three dot-separated base64url segments with a JSON payload.
pub fn decode_jwt_claims(token: &str) -> Option<Value> {
    let mut segments = token.split('.');
    let (_header, payload, _signature) = (segments.next()?, segments.next()?, segments.next()?);
    if segments.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[derive(Default)]
struct SetToken;

impl Command for SetToken {
    fn name(&self) -> &str {
        "token"
    }

    fn arity(&self) -> Arity {
        Arity::Any
    }

    fn run(&self, ctx: &mut Context, args: &[String]) -> Result<CommandResult> {
        let token = match args {
            [] => ui::input_password("Token")?,
            [token] => token.clone(),
            _ => return Ok(CommandResult::invalid_argument("usage: auth token [value]")),
        };
        if token.is_empty() {
            return Ok(CommandResult::invalid_argument("token is empty"));
        }

        ctx.token = Some(token);
        tracing::info!("bearer token set");
        Ok(CommandResult::success("token set"))
    }
}

#[derive(Default)]
struct ShowClaims;

impl Command for ShowClaims {
    fn name(&self) -> &str {
        "show"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(0)
    }

    fn run(&self, ctx: &mut Context, _args: &[String]) -> Result<CommandResult> {
        let Some(token) = ctx.token.as_deref() else {
            return Ok(CommandResult::error("no token set"));
        };
        match decode_jwt_claims(token) {
            Some(claims) => Ok(CommandResult::success(serde_json::to_string_pretty(&claims)?)),
            None => Ok(CommandResult::error("token is not a JWT")),
        }
    }
}

#[derive(Default)]
struct ClearToken;

impl Command for ClearToken {
    fn name(&self) -> &str {
        "clear"
    }

    fn arity(&self) -> Arity {
        Arity::Any
    }

    fn run(&self, ctx: &mut Context, args: &[String]) -> Result<CommandResult> {
        if ctx.token.is_none() {
            return Ok(CommandResult::none());
        }
        let confirmed = match args {
            [] => ui::confirm("Forget the current token", YES, NO, false)?,
            [answer] => ui::interpret_answer(answer, YES, NO, false),
            _ => return Ok(CommandResult::invalid_argument("usage: auth clear [y|n]")),
        };
        if !confirmed {
            return Ok(CommandResult::none());
        }

        ctx.token = None;
        Ok(CommandResult::success("token cleared"))
    }
}
