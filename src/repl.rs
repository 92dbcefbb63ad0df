// The interactive loop: prompt, read a line, dispatch it, repeat until the
// user types `exit` or input ends. Command failures are printed by the
// dispatcher and never end the loop.

use crate::context::Context;
use crate::dispatch::{dispatch_line, Flow};
use std::io::BufRead;

pub const PROMPT: &str = ">";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Stopped,
}

/// Owns the context for the lifetime of the session.
pub struct Repl {
    ctx: Context,
    state: State,
}

impl Repl {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            state: State::Running,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    /// Read and dispatch lines until `exit` or end of input. Only a failure
    /// to read input or write the prompt is returned as an error.
    ///
    /// Bytes that are not valid UTF-8 are replaced, so one bad line never
    /// ends the session.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> std::io::Result<()> {
        let mut buffer = Vec::new();
        while self.state == State::Running {
            self.ctx.prompt(PROMPT)?;

            buffer.clear();
            if input.read_until(b'\n', &mut buffer)? == 0 {
                tracing::debug!("end of input");
                self.state = State::Stopped;
                break;
            }

            let line = String::from_utf8_lossy(&buffer);
            if dispatch_line(&mut self.ctx, &line) == Flow::Stop {
                self.state = State::Stopped;
            }
        }
        Ok(())
    }
}
