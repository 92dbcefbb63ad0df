// State shared by the dispatcher and every command handler.
//
// One `Context` is built at startup and passed down explicitly. It holds the
// server address, the bearer token, the registry and the output sink.

use crate::api::ApiClient;
use crate::config::Settings;
use crate::error::Result;
use crate::registry::Registry;
use std::fmt::Display;
use std::io::Write;

/// How deep `run` scripts may call other scripts.
pub const MAX_SCRIPT_DEPTH: usize = 16;

pub struct Context {
    /// Server address exactly as the user typed it.
    pub base_address: String,
    pub token: Option<String>,
    pub registry: Registry,
    out: Box<dyn Write>,
    script_depth: usize,
    client: Option<CachedClient>,
}

/// The client last built, with the address and token it was built for.
struct CachedClient {
    base_address: String,
    token: Option<String>,
    client: ApiClient,
}

impl Context {
    /// An empty registry writing to `out`. Load modules afterwards.
    pub fn new(settings: &Settings, out: Box<dyn Write>) -> Self {
        Self {
            base_address: settings.base_address.clone(),
            token: settings.token.clone().filter(|t| !t.is_empty()),
            registry: Registry::new(),
            out,
            script_depth: 0,
            client: None,
        }
    }

    /// A client for the current address and token. The same client (and its
    /// cookie store) is handed out until either of them changes.
    pub fn api_client(&mut self) -> Result<ApiClient> {
        if let Some(cached) = &self.client {
            if cached.base_address == self.base_address && cached.token == self.token {
                return Ok(cached.client.clone());
            }
        }

        let client = ApiClient::new(&self.base_address, self.token.as_deref())?;
        tracing::debug!("new api client for {}", self.base_address);
        self.client = Some(CachedClient {
            base_address: self.base_address.clone(),
            token: self.token.clone(),
            client: client.clone(),
        });
        Ok(client)
    }

    /// Print one line. Output errors are logged, not raised: a closed
    /// stdout should not end a running script halfway.
    pub fn say(&mut self, text: impl Display) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|_| self.out.flush()) {
            tracing::warn!("failed to write output: {e}");
        }
    }

    /// Print the prompt without a newline.
    pub fn prompt(&mut self, prompt: &str) -> std::io::Result<()> {
        write!(self.out, "{prompt}")?;
        self.out.flush()
    }

    /// Direct access to the output sink, for terminal control sequences.
    pub fn output(&mut self) -> &mut Box<dyn Write> {
        &mut self.out
    }

    /// Enter a nested script. Returns false once the depth limit is hit.
    pub fn enter_script(&mut self) -> bool {
        if self.script_depth >= MAX_SCRIPT_DEPTH {
            return false;
        }
        self.script_depth += 1;
        true
    }

    pub fn leave_script(&mut self) {
        self.script_depth = self.script_depth.saturating_sub(1);
    }
}
