// The `utility` module: commands usable without a module prefix. Covers
// the server address, help, scripts, file viewing, module loading and the
// music endpoints.

use crate::api::is_success_status;
use crate::command::{factory, Arity, Command, CommandFactory, Module, ModuleSource};
use crate::context::Context;
use crate::dispatch::dispatch;
use crate::error::ClientError;
use crate::modules::external;
use crate::music;
use crate::outcome::CommandResult;
use crate::registry::UTILITY_MODULE;
use crate::tokenizer::parse_arguments;
use crate::ui;
use anyhow::Result;
use std::fs;
use std::path::Path;

/// Extension appended to the argument of `run`.
pub const SCRIPT_EXTENSION: &str = "run";

pub fn register(source: &mut ModuleSource) {
    source.register(|| Ok(Box::new(UtilityModule) as Box<dyn Module>));
}

struct UtilityModule;

impl Module for UtilityModule {
    fn name(&self) -> &str {
        UTILITY_MODULE
    }

    fn commands(&self) -> Vec<CommandFactory> {
        vec![
            factory::<SetBaseAddress>(),
            factory::<GetBaseAddress>(),
            factory::<Help>(),
            factory::<ClearScreen>(),
            factory::<RunScript>(),
            factory::<ViewFile>(),
            factory::<LoadModule>(),
            factory::<UploadMusic>(),
            factory::<ListMusic>(),
            factory::<PlayMusic>(),
            factory::<ShowServer>(),
            factory::<MusicInfo>(),
        ]
    }
}

#[derive(Default)]
struct SetBaseAddress;

impl Command for SetBaseAddress {
    fn name(&self) -> &str {
        "setBaseAddr"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn run(&self, ctx: &mut Context, args: &[String]) -> Result<CommandResult> {
        ctx.base_address = args[0].clone();
        tracing::info!("base address set to {}", ctx.base_address);
        Ok(CommandResult::success(ctx.base_address.clone()))
    }
}

#[derive(Default)]
struct GetBaseAddress;

impl Command for GetBaseAddress {
    fn name(&self) -> &str {
        "getBaseAddr"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(0)
    }

    fn run(&self, ctx: &mut Context, _args: &[String]) -> Result<CommandResult> {
        Ok(CommandResult::success(ctx.base_address.clone()))
    }
}

/// `help` lists everything; `help <module>` lists one module.
#[derive(Default)]
struct Help;

impl Command for Help {
    fn name(&self) -> &str {
        "help"
    }

    fn arity(&self) -> Arity {
        Arity::Any
    }

    fn run(&self, ctx: &mut Context, args: &[String]) -> Result<CommandResult> {
        match args {
            [] => Ok(CommandResult::success(ctx.registry.help_listing())),
            [module] => Ok(match ctx.registry.module_listing(module) {
                Some(listing) => CommandResult::success(listing),
                None => CommandResult::invalid_argument(format!("unknown module {module}")),
            }),
            _ => Ok(CommandResult::invalid_argument("usage: help [module]")),
        }
    }
}

#[derive(Default)]
struct ClearScreen;

impl Command for ClearScreen {
    fn name(&self) -> &str {
        "clear"
    }

    fn arity(&self) -> Arity {
        Arity::Any
    }

    fn run(&self, ctx: &mut Context, _args: &[String]) -> Result<CommandResult> {
        ui::clear_screen(ctx.output())?;
        Ok(CommandResult::success(""))
    }
}

/// `run <path>` executes every line of `<path>.run` as if typed.
#[derive(Default)]
struct RunScript;

impl Command for RunScript {
    fn name(&self) -> &str {
        "run"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn run(&self, ctx: &mut Context, args: &[String]) -> Result<CommandResult> {
        let path = format!("{}.{}", args[0], SCRIPT_EXTENSION);
        if !Path::new(&path).is_file() {
            return Ok(CommandResult::error("file not found"));
        }
        let script = fs::read_to_string(&path).map_err(|e| ClientError::io(path.clone(), e))?;

        if !ctx.enter_script() {
            return Ok(CommandResult::error(format!(
                "{path}: scripts nested too deeply"
            )));
        }
        tracing::debug!("running script {path}");
        for line in script.lines() {
            // `exit` ends neither the script nor the session.
            dispatch(ctx, &parse_arguments(line.trim()));
        }
        ctx.leave_script();

        Ok(CommandResult::success(""))
    }
}

#[derive(Default)]
struct ViewFile;

impl Command for ViewFile {
    fn name(&self) -> &str {
        "view"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn run(&self, _ctx: &mut Context, args: &[String]) -> Result<CommandResult> {
        let path = &args[0];
        if !Path::new(path).is_file() {
            return Ok(CommandResult::error("file not found"));
        }
        let contents = fs::read_to_string(path).map_err(|e| ClientError::io(path.clone(), e))?;

        let mut text = format!("\n{path}\n");
        for line in contents.lines() {
            text.push_str(line);
            text.push('\n');
        }
        Ok(CommandResult::success(text))
    }
}

/// `loadMDL <manifest>` adds the modules described by a manifest file.
#[derive(Default)]
struct LoadModule;

impl Command for LoadModule {
    fn name(&self) -> &str {
        "loadMDL"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn run(&self, ctx: &mut Context, args: &[String]) -> Result<CommandResult> {
        let path = Path::new(&args[0]);
        if !path.is_file() {
            return Ok(CommandResult::error(format!(
                "MDL {} does not exist",
                args[0]
            )));
        }

        let report = external::load_into(ctx, path)?;
        ctx.say(&report);
        Ok(CommandResult::success(format!("loaded {}", args[0])))
    }
}

#[derive(Default)]
struct UploadMusic;

impl Command for UploadMusic {
    fn name(&self) -> &str {
        "upload"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn run(&self, ctx: &mut Context, args: &[String]) -> Result<CommandResult> {
        let file_path = &args[0];
        let client = ctx.api_client()?;

        let spinner = ui::spinner("Uploading...");
        let status = music::upload(&client, Path::new(file_path));
        spinner.finish_and_clear();

        let status = status?;
        if is_success_status(status) {
            return Ok(CommandResult::success(format!("{file_path} uploaded")));
        }
        Ok(CommandResult::http_error(status))
    }
}

#[derive(Default)]
struct ListMusic;

impl Command for ListMusic {
    fn name(&self) -> &str {
        "list"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(0)
    }

    fn run(&self, ctx: &mut Context, _args: &[String]) -> Result<CommandResult> {
        let response = music::list(&ctx.api_client()?)?;
        if !response.is_success() {
            return Ok(CommandResult::http_error(response.status));
        }

        let tracks = response.result.unwrap_or_default();
        let lines: Vec<String> = tracks.iter().map(|m| m.summary()).collect();
        Ok(CommandResult::success(lines.join("\n")))
    }
}

#[derive(Default)]
struct PlayMusic;

impl Command for PlayMusic {
    fn name(&self) -> &str {
        "play"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn run(&self, ctx: &mut Context, args: &[String]) -> Result<CommandResult> {
        let response = music::play(&ctx.api_client()?, &args[0])?;
        match response.result {
            Some(track) if response.is_success() => {
                Ok(CommandResult::success(format!("now playing {}", track.name)))
            }
            _ => Ok(CommandResult::http_error(response.status)),
        }
    }
}

/// `show <id>` toggles whether the server shows its window.
#[derive(Default)]
struct ShowServer;

impl Command for ShowServer {
    fn name(&self) -> &str {
        "show"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn run(&self, ctx: &mut Context, args: &[String]) -> Result<CommandResult> {
        let response = music::show(&ctx.api_client()?, &args[0])?;
        match response.result {
            Some(true) if response.is_success() => {
                Ok(CommandResult::success("server is now showed"))
            }
            Some(false) if response.is_success() => {
                Ok(CommandResult::success("server is now hided"))
            }
            _ => Ok(CommandResult::http_error(response.status)),
        }
    }
}

#[derive(Default)]
struct MusicInfo;

impl Command for MusicInfo {
    fn name(&self) -> &str {
        "info"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn run(&self, ctx: &mut Context, args: &[String]) -> Result<CommandResult> {
        let response = music::info(&ctx.api_client()?, &args[0])?;
        match response.result {
            Some(track) if response.is_success() => Ok(CommandResult::success(track.to_string())),
            _ => Ok(CommandResult::http_error(response.status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::outcome::ResultCode;

    fn context() -> Context {
        let mut ctx = Context::new(&Settings::default(), Box::new(std::io::sink()));
        let mut source = ModuleSource::new("test");
        register(&mut source);
        ctx.registry.load([source]);
        ctx
    }

    fn run(ctx: &mut Context, command: &str, args: &[&str]) -> CommandResult {
        let command = ctx
            .registry
            .command(UTILITY_MODULE, command)
            .expect("command registered");
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        crate::dispatch::invoke(ctx, command.as_ref(), &args)
    }

    #[test]
    fn registers_every_utility_command() {
        let ctx = context();
        let names: Vec<&str> = ctx.registry.command_names(UTILITY_MODULE).unwrap().collect();
        assert_eq!(
            names,
            vec![
                "clear",
                "getBaseAddr",
                "help",
                "info",
                "list",
                "loadMDL",
                "play",
                "run",
                "setBaseAddr",
                "show",
                "upload",
                "view"
            ]
        );
    }

    #[test]
    fn base_address_round_trip() {
        let mut ctx = context();
        let set = run(&mut ctx, "setBaseAddr", &["http://host:1234"]);
        assert_eq!(set.message(), "http://host:1234");
        let get = run(&mut ctx, "getBaseAddr", &[]);
        assert_eq!(get, CommandResult::success("http://host:1234"));
    }

    #[test]
    fn help_for_unknown_module_is_invalid_argument() {
        let mut ctx = context();
        let result = run(&mut ctx, "help", &["nope"]);
        assert_eq!(result.code(), ResultCode::InvalidArgument);
    }

    #[test]
    fn help_lists_utility_commands() {
        let mut ctx = context();
        let result = run(&mut ctx, "help", &[]);
        assert!(result.message().starts_with("Modules:\n  utility\n    clear"));
    }

    #[test]
    fn missing_files_are_reported() {
        let mut ctx = context();
        assert_eq!(
            run(&mut ctx, "view", &["/no/such/file.txt"]),
            CommandResult::error("file not found")
        );
        assert_eq!(
            run(&mut ctx, "run", &["/no/such/script"]),
            CommandResult::error("file not found")
        );
        assert_eq!(
            run(&mut ctx, "loadMDL", &["/no/such/module.toml"]),
            CommandResult::error("MDL /no/such/module.toml does not exist")
        );
    }

    #[test]
    fn view_returns_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "one\ntwo\n").unwrap();
        let path = path.display().to_string();

        let mut ctx = context();
        let result = run(&mut ctx, "view", &[&path]);
        assert_eq!(result.message(), format!("\n{path}\none\ntwo\n"));
    }

    #[test]
    fn network_commands_without_base_address_fail_cleanly() {
        let mut ctx = context();
        let result = run(&mut ctx, "list", &[]);
        assert_eq!(result.code(), ResultCode::Error);
        assert!(result.message().starts_with("InvalidBaseAddress : "));
    }

    #[test]
    fn clear_writes_to_output() {
        let mut ctx = context();
        assert!(run(&mut ctx, "clear", &["ignored"]).is_success());
    }
}
