// Command results: the value every command hands back to the dispatcher,
// which prints it. Results are built at the call site and never changed.

use crate::error::ClientError;
use reqwest::StatusCode;
use std::fmt;

/// Outcome category of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    None,
    Success,
    InvalidArgument,
    Error,
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResultCode::None => "None",
            ResultCode::Success => "Success",
            ResultCode::InvalidArgument => "InvalidArgument",
            ResultCode::Error => "Error",
        };
        f.write_str(label)
    }
}

/// A result code with an optional message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    code: ResultCode,
    message: String,
}

impl CommandResult {
    pub fn new(code: ResultCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn none() -> Self {
        Self::new(ResultCode::None, "")
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ResultCode::Success, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ResultCode::InvalidArgument, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ResultCode::Error, message)
    }

    /// An HTTP failure, carrying the status text (e.g. `404 Not Found`).
    pub fn http_error(status: StatusCode) -> Self {
        Self::error(status.to_string())
    }

    /// Flatten an error and its causes into one `kind : message` line each.
    pub fn from_error(err: &anyhow::Error) -> Self {
        let lines: Vec<String> = err
            .chain()
            .map(|cause| format!("{} : {}", error_kind(cause), cause))
            .collect();
        Self::error(lines.join("\n"))
    }

    pub fn code(&self) -> ResultCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_success(&self) -> bool {
        self.code == ResultCode::Success
    }
}

/// Label for one link of an error chain.
fn error_kind(err: &(dyn std::error::Error + 'static)) -> &'static str {
    if let Some(client) = err.downcast_ref::<ClientError>() {
        client.kind()
    } else if err.is::<reqwest::Error>() {
        "HttpError"
    } else if err.is::<std::io::Error>() {
        "IoError"
    } else if err.is::<serde_json::Error>() {
        "JsonError"
    } else {
        "Error"
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = if self.message.is_empty() {
            "empty"
        } else {
            &self.message
        };
        write!(f, "{} :\n{}", self.code, message)
    }
}
