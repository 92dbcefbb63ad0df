// Console helpers: the few interactive bits that commands need beyond the
// prompt loop itself (confirmations, hidden token input, a spinner while an
// upload runs, clearing the screen).

use anyhow::Result;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;

/// Decide a yes/no answer. `ok` and `no` are `|`-separated lists of
/// accepted answers. Anything in neither list yields `default`.
pub fn interpret_answer(input: &str, ok: &str, no: &str, default: bool) -> bool {
    let input = input.trim();
    if ok.split('|').any(|s| s == input) {
        return true;
    }
    if no.split('|').any(|s| s == input) {
        return false;
    }
    default
}

/// Ask `{prompt}?({ok}/{no})` on the terminal and interpret the answer.
pub fn confirm(prompt: &str, ok: &str, no: &str, default: bool) -> Result<bool> {
    let answer: String = Input::new()
        .with_prompt(format!("{prompt}?({ok}/{no})"))
        .allow_empty(true)
        .interact_text()?;
    Ok(interpret_answer(&answer, ok, no, default))
}

/// Read a secret without echoing it.
pub fn input_password(prompt: &str) -> Result<String> {
    Ok(Password::new().with_prompt(prompt).interact()?)
}

/// A ticking spinner with a message. Call `finish_and_clear` when done.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Clear the terminal and move the cursor home.
pub fn clear_screen<W: Write>(out: &mut W) -> std::io::Result<()> {
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))
}
