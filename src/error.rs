// Error types for the client.
//
// Command handlers return `anyhow::Result`; the variants here are the typed
// failures the API client and the module loader produce underneath.

use thiserror::Error;

/// Failures raised while talking to the music server, reading the config
/// or loading modules.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The configured base address is empty or not an absolute URL.
    #[error("invalid base address '{address}': {reason}")]
    InvalidBaseAddress { address: String, reason: String },

    /// The bearer token contains characters not allowed in a header.
    #[error("token is not a valid header value")]
    InvalidToken,

    /// The request could not be sent or the connection failed.
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered 2xx but the body was not the expected JSON.
    #[error("could not decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Local file access failed.
    #[error("cannot access {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The config file is malformed.
    #[error("config file {path}: {message}")]
    Config { path: String, message: String },

    /// A module manifest could not be read or is malformed.
    #[error("module manifest {path}: {message}")]
    Manifest { path: String, message: String },
}

impl ClientError {
    pub fn invalid_base_address(address: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidBaseAddress {
            address: address.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn manifest(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Short label shown in front of the message when a command fails.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidBaseAddress { .. } => "InvalidBaseAddress",
            Self::InvalidToken => "InvalidToken",
            Self::Transport { .. } => "TransportError",
            Self::Decode { .. } => "DecodeError",
            Self::Io { .. } => "IoError",
            Self::Config { .. } => "ConfigError",
            Self::Manifest { .. } => "ManifestError",
        }
    }
}

/// Result type alias using ClientError.
pub type Result<T> = std::result::Result<T, ClientError>;
