// Music server endpoints, built on top of `ApiClient`.
//
//   GET  /api/music             list of tracks
//   GET  /api/music/{id}        one track
//   GET  /api/music/play/{id}   start playback, returns the track
//   GET  /api/music/show/{id}   toggle the server window, returns a bool
//   POST /api/music/{filename}  multipart upload

use crate::api::{ApiClient, ApiResult};
use crate::error::{ClientError, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::Path;

pub const MUSIC_PATH: &str = "api/music";
pub const PLAY_PATH: &str = "api/music/play";
pub const SHOW_PATH: &str = "api/music/show";

/// A track as the server describes it. `ID` is kept as a JSON value since
/// servers use numbers or GUID strings; any other field is kept verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Music {
    #[serde(rename = "ID", alias = "id", alias = "Id")]
    pub id: Value,
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Music {
    /// The id as plain text, without JSON quotes.
    pub fn id_text(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// One-line summary used by `list`.
    pub fn summary(&self) -> String {
        format!("Name: {}, ID: {}", self.name, self.id_text())
    }
}

impl fmt::Display for Music {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())?;
        for (key, value) in &self.extra {
            match value {
                Value::String(s) => write!(f, "\n{key}: {s}")?,
                other => write!(f, "\n{key}: {other}")?,
            }
        }
        Ok(())
    }
}

/// GET /api/music
pub fn list(client: &ApiClient) -> Result<ApiResult<Vec<Music>>> {
    client.get_objects(MUSIC_PATH)
}

/// GET /api/music/{id}
pub fn info(client: &ApiClient, id: &str) -> Result<ApiResult<Music>> {
    client.get_object(MUSIC_PATH, id)
}

/// GET /api/music/play/{id}
pub fn play(client: &ApiClient, id: &str) -> Result<ApiResult<Music>> {
    client.get_object(PLAY_PATH, id)
}

/// GET /api/music/show/{id}; `true` means the server window is now shown.
pub fn show(client: &ApiClient, id: &str) -> Result<ApiResult<bool>> {
    client.get_object(SHOW_PATH, id)
}

/// Upload a local file to POST /api/music/{filename}.
///
/// The whole file is read before the request starts, and the handle is
/// closed before any network I/O.
pub fn upload(client: &ApiClient, file_path: &Path) -> Result<StatusCode> {
    let file_name = file_path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            ClientError::io(
                file_path.display().to_string(),
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
            )
        })?;
    let data = fs::read(file_path).map_err(|e| ClientError::io(file_path.display().to_string(), e))?;

    client.upload_file(MUSIC_PATH, file_name, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_server_casing() {
        let music: Music =
            serde_json::from_value(json!({"ID": 3, "Name": "Intro", "Path": "c:/m/intro.mp3"}))
                .unwrap();
        assert_eq!(music.id_text(), "3");
        assert_eq!(music.name, "Intro");
        assert_eq!(music.extra.get("Path"), Some(&json!("c:/m/intro.mp3")));
    }

    #[test]
    fn deserializes_lowercase_fields() {
        let music: Music =
            serde_json::from_value(json!({"id": "a1b2", "name": "Outro"})).unwrap();
        assert_eq!(music.id_text(), "a1b2");
        assert_eq!(music.summary(), "Name: Outro, ID: a1b2");
    }

    #[test]
    fn display_lists_extra_fields() {
        let music: Music =
            serde_json::from_value(json!({"ID": 1, "Name": "A", "Length": 120, "Artist": "B"}))
                .unwrap();
        assert_eq!(music.to_string(), "Name: A, ID: 1\nArtist: B\nLength: 120");
    }

    #[test]
    fn upload_missing_file_is_io_error() {
        let client = ApiClient::new("http://127.0.0.1:9", None).unwrap();
        let err = upload(&client, Path::new("/definitely/not/here.mp3")).unwrap_err();
        assert_eq!(err.kind(), "IoError");
    }
}
