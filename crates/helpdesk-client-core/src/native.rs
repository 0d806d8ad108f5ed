//! Native transport and session storage used by the command line client.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::multipart::{Form, Part};

use crate::config::ClientConfig;
use crate::endpoints::Endpoints;
use crate::error::{SessionStoreError, TransportError};
use crate::models::UserRecord;
use crate::session::{Session, SessionStore, decode_user_slot};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBody};

/// `reqwest` transport with a cookie jar, so the refresh cookie set at login
/// is replayed to the refresh endpoint.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    cookies: Arc<Jar>,
    cookie_url: reqwest::Url,
    /// Path restored cookies are scoped to: the auth directory holding the
    /// refresh and logout endpoints.
    cookie_path: String,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let cookies = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .cookie_provider(Arc::clone(&cookies))
            .build()
            .map_err(|error| TransportError::new(format!("http client init failed: {error}")))?;
        let refresh_url = Endpoints::from_config(config).url(Endpoints::refresh_path());
        let cookie_url = reqwest::Url::parse(&refresh_url)
            .map_err(|error| TransportError::new(format!("invalid base url: {error}")))?;
        let cookie_path = parent_path(cookie_url.path());
        Ok(Self {
            http,
            cookies,
            cookie_url,
            cookie_path,
        })
    }

    /// Loads cookies saved by [`ReqwestTransport::save_cookies`], scoped to
    /// the auth endpoints only. A missing file is not an error.
    pub fn load_cookies(&self, path: &Path) -> Result<usize, SessionStoreError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(error) => return Err(unavailable(path, &error)),
        };
        let mut loaded = 0;
        for pair in raw.split(';').map(str::trim).filter(|pair| pair.contains('=')) {
            self.cookies
                .add_cookie_str(&format!("{pair}; Path={}", self.cookie_path), &self.cookie_url);
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Writes the cookies the refresh endpoint would receive; removes the
    /// file when there are none.
    pub fn save_cookies(&self, path: &Path) -> Result<(), SessionStoreError> {
        let header = self
            .cookies
            .cookies(&self.cookie_url)
            .and_then(|value| value.to_str().map(str::to_string).ok());
        match header {
            Some(header) if !header.trim().is_empty() => write_private(path, &header),
            _ => remove_if_present(path),
        }
    }
}

#[async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.http.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.body(body.clone()),
            RequestBody::Multipart(parts) => {
                let mut form = Form::new();
                for file in parts {
                    let mut part = Part::bytes(file.bytes.clone()).file_name(file.filename.clone());
                    if let Some(content_type) = &file.content_type {
                        part = part.mime_str(content_type).map_err(|error| {
                            TransportError::new(format!("invalid content type: {error}"))
                        })?;
                    }
                    form = form.part(file.field.clone(), part);
                }
                builder.multipart(form)
            }
        };

        let response = builder
            .send()
            .await
            .map_err(|error| TransportError::new(error.to_string()))?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value: &HeaderValue| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|error| TransportError::new(format!("failed to read response: {error}")))?;
        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

/// `/api/v1/users/auth/refresh/` becomes `/api/v1/users/auth/`.
fn parent_path(path: &str) -> String {
    match path.trim_end_matches('/').rsplit_once('/') {
        Some((parent, _)) if !parent.is_empty() => format!("{parent}/"),
        _ => "/".to_string(),
    }
}

/// JSON file holding the `accessToken` and `currentUser` slots.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Session {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) => {
                if error.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %error, "session file unreadable");
                }
                return Session::default();
            }
        };
        let value = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(path = %self.path.display(), error = %error, "session file corrupt");
                return Session::default();
            }
        };
        let access_token = value
            .get(crate::config::ACCESS_TOKEN_STORAGE_KEY)
            .and_then(serde_json::Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string);
        let current_user = value
            .get(crate::config::CURRENT_USER_STORAGE_KEY)
            .map(serde_json::Value::to_string);
        Session {
            access_token,
            current_user: decode_user_slot(current_user.as_deref()),
        }
    }

    fn set(&self, access_token: &str, user: Option<&UserRecord>) -> Result<(), SessionStoreError> {
        let session = Session {
            access_token: Some(access_token.to_string()),
            current_user: user.cloned(),
        };
        let encoded = serde_json::to_string_pretty(&session).map_err(|error| {
            SessionStoreError::Serialize {
                message: error.to_string(),
            }
        })?;
        write_private(&self.path, &encoded)
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        remove_if_present(&self.path)
    }
}

fn write_private(path: &Path, contents: &str) -> Result<(), SessionStoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|error| unavailable(parent, &error))?;
    }
    let staging = path.with_extension("tmp");
    fs::write(&staging, contents).map_err(|error| unavailable(&staging, &error))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&staging, fs::Permissions::from_mode(0o600))
            .map_err(|error| unavailable(&staging, &error))?;
    }
    fs::rename(&staging, path).map_err(|error| unavailable(path, &error))
}

fn remove_if_present(path: &Path) -> Result<(), SessionStoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(unavailable(path, &error)),
    }
}

fn unavailable(path: &Path, error: &std::io::Error) -> SessionStoreError {
    SessionStoreError::Unavailable {
        message: format!("{}: {error}", path.display()),
    }
}
