// Entrypoint for the remote music client.
// - Load settings and start logging.
// - Register the built-in modules and any manifests listed in the config.
// - Hand the context to the prompt loop, which blocks until `exit`.

use remote_music_cli::config::Settings;
use remote_music_cli::context::Context;
use remote_music_cli::modules::{self, external};
use remote_music_cli::repl::Repl;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load();
    remote_music_cli::logging::init_stderr_logging(&settings.log_level);

    let mut ctx = Context::new(&settings, Box::new(std::io::stdout()));
    let report = ctx.registry.load([modules::builtin_source()]);
    ctx.say(&report);

    for path in &settings.modules {
        match external::load_into(&mut ctx, path) {
            Ok(report) => ctx.say(&report),
            Err(e) => {
                tracing::warn!("could not load module {}: {e:#}", path.display());
                ctx.say(format!("could not load {}: {e}", path.display()));
            }
        }
    }

    let mut repl = Repl::new(ctx);
    repl.run(std::io::stdin().lock())?;
    Ok(())
}
