// Startup configuration.
//
// Settings come from a TOML file and environment variables. The file is
// optional and only read, never written back.
//
// Lookup order (later wins):
// 1. Built-in defaults
// 2. `$MUSIC_CLIENT_CONFIG` or `{config_dir}/remote-music/config.toml`
// 3. `MUSIC_SERVER_URL` / `MUSIC_SERVER_TOKEN`

use crate::error::{ClientError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "MUSIC_CLIENT_CONFIG";
pub const BASE_ADDRESS_ENV: &str = "MUSIC_SERVER_URL";
pub const TOKEN_ENV: &str = "MUSIC_SERVER_TOKEN";

/// Settings read at process start.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Address of the music server, e.g. `http://localhost:5000`.
    pub base_address: String,
    /// Bearer token sent with every request.
    pub token: Option<String>,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Module manifests loaded before the first prompt.
    pub modules: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_address: String::new(),
            token: None,
            log_level: "warn".to_string(),
            modules: Vec::new(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| ClientError::Config {
            path: origin.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Read settings from a file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            fs::read_to_string(path).map_err(|e| ClientError::io(path.display().to_string(), e))?;
        Self::from_toml(&content, path)
    }

    /// Apply environment overrides through a lookup function.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = lookup(BASE_ADDRESS_ENV).filter(|v| !v.is_empty()) {
            self.base_address = address;
        }
        if let Some(token) = lookup(TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.token = Some(token);
        }
    }

    /// Load the full configuration: file, then process environment.
    ///
    /// A malformed file is reported as a warning and the defaults are used,
    /// so a broken config never keeps the prompt from starting.
    pub fn load() -> Self {
        let path = config_path();
        let mut settings = match Self::from_file(&path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Warning: ignoring config file {}: {e}", path.display());
                Self::default()
            }
        };
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }
}

/// Location of the config file.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("remote-music")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.base_address, "");
        assert_eq!(settings.token, None);
        assert_eq!(settings.log_level, "warn");
        assert!(settings.modules.is_empty());
    }

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let settings =
            Settings::from_toml("base_address = \"http://host:1234\"\n", Path::new("x.toml"))
                .unwrap();
        assert_eq!(settings.base_address, "http://host:1234");
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn test_parse_full_file() {
        let content = r#"
base_address = "http://music.local"
token = "abc"
log_level = "debug"
modules = ["tools.toml", "extra/other.toml"]
"#;
        let settings = Settings::from_toml(content, Path::new("x.toml")).unwrap();
        assert_eq!(settings.token.as_deref(), Some("abc"));
        assert_eq!(settings.log_level, "debug");
        assert_eq!(
            settings.modules,
            vec![PathBuf::from("tools.toml"), PathBuf::from("extra/other.toml")]
        );
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let err = Settings::from_toml("base_address = [", Path::new("bad.toml")).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "token = \"t0k\"").unwrap();
        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.token.as_deref(), Some("t0k"));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut settings = Settings {
            base_address: "http://file".into(),
            ..Settings::default()
        };
        settings.apply_env(|key| match key {
            BASE_ADDRESS_ENV => Some("http://env".into()),
            TOKEN_ENV => Some(String::new()),
            _ => None,
        });
        assert_eq!(settings.base_address, "http://env");
        assert_eq!(settings.token, None);
    }
}
