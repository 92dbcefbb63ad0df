// Library root
// -----------
// This crate exposes the pieces of the remote music client. The binary
// (`main.rs`) wires them into the interactive prompt.
//
// Module responsibilities:
// - `tokenizer`: splits a typed line into words.
// - `command` / `registry`: command and module capabilities and the
//   module → command lookup table they register into.
// - `dispatch` / `repl`: resolve, check arity, run and print; the prompt loop.
// - `context`: the single state object handed to every command.
// - `api` / `music`: HTTP access to the music server.
// - `modules`: the built-in modules and manifest-backed external ones.
// - `config`, `logging`, `error`, `outcome`, `ui`: supporting pieces.
pub mod api;
pub mod command;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod modules;
pub mod music;
pub mod outcome;
pub mod registry;
pub mod repl;
pub mod tokenizer;
pub mod ui;
