// API client module: a small blocking HTTP client bound to one base address
// of the music server. Every call waits for the full response before it
// returns, which is all the single-threaded prompt needs.
//
// Non-2xx answers are not errors here: they come back as an `ApiResult`
// with no value and the status code, and the caller decides what to print.
// Only transport failures and undecodable 2xx bodies become `ClientError`.

use crate::error::{ClientError, Result};
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, LOCATION};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Returns true for 200..=299 only. Redirect statuses count as failures.
pub fn is_success_status(status: StatusCode) -> bool {
    (200..=299).contains(&status.as_u16())
}

/// A decoded response value (if the call succeeded) and the HTTP status.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult<T> {
    pub result: Option<T>,
    pub status: StatusCode,
}

impl<T> ApiResult<T> {
    fn ok(result: T, status: StatusCode) -> Self {
        Self {
            result: Some(result),
            status,
        }
    }

    fn failed(status: StatusCode) -> Self {
        Self {
            result: None,
            status,
        }
    }

    pub fn is_success(&self) -> bool {
        is_success_status(self.status)
    }
}

/// Blocking API client holding a reqwest client, the base URL of the music
/// server and an optional bearer token attached to every request.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Build a client for `base_address`. The address must be an absolute
    /// URL; the token, when present, is sent as `Authorization: Bearer`.
    pub fn new(base_address: &str, token: Option<&str>) -> Result<Self> {
        let base_url = Url::parse(base_address)
            .map_err(|e| ClientError::invalid_base_address(base_address, e))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::invalid_base_address(
                base_address,
                "address cannot have a path",
            ));
        }

        let token = token.filter(|t| !t.is_empty()).map(str::to_string);
        let client = Client::builder()
            .cookie_store(true)
            .default_headers(auth_headers(token.as_deref())?)
            .build()
            .map_err(|source| ClientError::Transport {
                url: base_url.to_string(),
                source,
            })?;

        Ok(ApiClient {
            client,
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns whether a token is attached to the requests.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Resolve `path` (and optionally `/{id}`) below the base URL. Each
    /// segment is percent-encoded, so ids and file names may contain spaces.
    pub fn endpoint(&self, path: &str, id: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ClientError::invalid_base_address(self.base_url.as_str(), "address cannot have a path")
            })?;
            segments.pop_if_empty();
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// POST a JSON object and decode the same type from the response.
    pub fn post_object<T>(&self, path: &str, body: &T) -> Result<ApiResult<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        self.post_object_as::<T, T>(path, body)
    }

    /// POST a JSON object when the response type differs from the request.
    pub fn post_object_as<Req, Resp>(&self, path: &str, body: &Req) -> Result<ApiResult<Resp>>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint(path, None)?;
        tracing::debug!("post {url}");

        let response = send(self.client.post(url.clone()).json(body), &url)?;
        decode_response(response, &url)
    }

    /// GET a list of objects.
    pub fn get_objects<T>(&self, path: &str) -> Result<ApiResult<Vec<T>>>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(path, None)?;
        tracing::debug!("get many {url}");

        let response = send(self.client.get(url.clone()), &url)?;
        decode_response(response, &url)
    }

    /// GET one object at `{path}/{id}`.
    pub fn get_object<T>(&self, path: &str, id: &str) -> Result<ApiResult<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(path, Some(id))?;
        tracing::debug!("get {url}");

        let response = send(self.client.get(url.clone()), &url)?;
        decode_response(response, &url)
    }

    /// PUT an object at `{path}/{id}`. On success the result holds the
    /// `Location` header, resolved against the request URL, if the server
    /// sent one.
    pub fn put_object<T>(&self, path: &str, id: &str, body: &T) -> Result<ApiResult<Url>>
    where
        T: Serialize + ?Sized,
    {
        let url = self.endpoint(path, Some(id))?;
        tracing::debug!("put {url}");

        let response = send(self.client.put(url.clone()).json(body), &url)?;
        let status = response.status();
        if !is_success_status(status) {
            tracing::debug!("put {url} returned {status}");
            return Ok(ApiResult::failed(status));
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| url.join(value).ok());
        Ok(ApiResult {
            result: location,
            status,
        })
    }

    /// DELETE `{path}/{id}` and return the status code.
    pub fn delete_object(&self, path: &str, id: &str) -> Result<StatusCode> {
        let url = self.endpoint(path, Some(id))?;
        tracing::debug!("delete {url}");

        let response = send(self.client.delete(url.clone()), &url)?;
        Ok(response.status())
    }

    /// Upload a file as multipart/form-data to `{path}/{file_name}`. The
    /// form has a single part named `file`.
    pub fn upload_file(&self, path: &str, file_name: &str, data: Vec<u8>) -> Result<StatusCode> {
        let url = self.endpoint(path, Some(file_name))?;
        tracing::debug!("upload {} bytes to {url}", data.len());

        let part = multipart::Part::bytes(data).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = send(self.client.post(url.clone()).multipart(form), &url)?;
        Ok(response.status())
    }
}

/// Helper to build the Authorization header map when a token is set.
fn auth_headers(token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(t) = token {
        let mut value =
            HeaderValue::from_str(&format!("Bearer {t}")).map_err(|_| ClientError::InvalidToken)?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

fn send(request: RequestBuilder, url: &Url) -> Result<Response> {
    request.send().map_err(|source| ClientError::Transport {
        url: url.to_string(),
        source,
    })
}

fn decode_response<T>(response: Response, url: &Url) -> Result<ApiResult<T>>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if !is_success_status(status) {
        tracing::debug!("{url} returned {status}");
        return Ok(ApiResult::failed(status));
    }

    let value = response.json::<T>().map_err(|source| ClientError::Decode {
        url: url.to_string(),
        source,
    })?;
    Ok(ApiResult::ok(value, status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_200_to_299() {
        assert!(is_success_status(StatusCode::OK));
        assert!(is_success_status(StatusCode::NO_CONTENT));
        assert!(is_success_status(StatusCode::from_u16(299).unwrap()));
        assert!(!is_success_status(StatusCode::MULTIPLE_CHOICES));
        assert!(!is_success_status(StatusCode::FOUND));
        assert!(!is_success_status(StatusCode::NOT_FOUND));
        assert!(!is_success_status(StatusCode::CONTINUE));
    }

    #[test]
    fn empty_base_address_is_rejected() {
        let err = ApiClient::new("", None).unwrap_err();
        assert_eq!(err.kind(), "InvalidBaseAddress");
    }

    #[test]
    fn relative_base_address_is_rejected() {
        assert!(ApiClient::new("localhost/api", None).is_err());
    }

    #[test]
    fn non_hierarchical_address_is_rejected() {
        assert!(ApiClient::new("mailto:someone@example.com", None).is_err());
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let err = ApiClient::new("http://localhost", Some("bad\ntoken")).unwrap_err();
        assert_eq!(err.kind(), "InvalidToken");
    }

    #[test]
    fn empty_token_means_no_token() {
        let client = ApiClient::new("http://localhost", Some("")).unwrap();
        assert!(!client.has_token());
        let client = ApiClient::new("http://localhost", Some("abc")).unwrap();
        assert!(client.has_token());
    }

    #[test]
    fn endpoint_joins_path_and_id() {
        let client = ApiClient::new("http://host:1234", None).unwrap();
        let url = client.endpoint("api/music/play", Some("7")).unwrap();
        assert_eq!(url.as_str(), "http://host:1234/api/music/play/7");
    }

    #[test]
    fn endpoint_keeps_base_path_and_ignores_slashes() {
        let client = ApiClient::new("http://host/server/", None).unwrap();
        let url = client.endpoint("/api/music/", None).unwrap();
        assert_eq!(url.as_str(), "http://host/server/api/music");
    }

    #[test]
    fn endpoint_encodes_file_names() {
        let client = ApiClient::new("http://host", None).unwrap();
        let url = client.endpoint("api/music", Some("my song.mp3")).unwrap();
        assert_eq!(url.as_str(), "http://host/api/music/my%20song.mp3");
    }
}
