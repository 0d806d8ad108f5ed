use crate::auth::AuthInputError;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";
pub const ENV_API_BASE_URL: &str = "HELPDESK_API_BASE_URL";
pub const API_PATH_PREFIX: &str = "/api/v1";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;
pub const MIN_REQUEST_TIMEOUT_MS: u64 = 250;

/// Durable storage slot for the bearer token.
pub const ACCESS_TOKEN_STORAGE_KEY: &str = "accessToken";
/// Durable storage slot for the JSON-serialized user record.
pub const CURRENT_USER_STORAGE_KEY: &str = "currentUser";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, AuthInputError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        })
    }

    /// Resolves the API base URL from the environment, falling back to the
    /// local development server. Returns the config and the source it came from.
    pub fn from_env() -> Result<(Self, &'static str), AuthInputError> {
        let (base_url, source) = resolve_api_base_url()?;
        Ok((
            Self {
                base_url,
                request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            },
            source,
        ))
    }

    /// Same-origin deployment: the API is mounted under `/api/v1` of the page origin.
    pub fn for_origin(origin: &str) -> Result<Self, AuthInputError> {
        let origin = normalize_base_url(origin)?;
        Self::new(&format!("{origin}{API_PATH_PREFIX}"))
    }

    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms.max(MIN_REQUEST_TIMEOUT_MS);
        self
    }
}

pub fn resolve_api_base_url() -> Result<(String, &'static str), AuthInputError> {
    if let Some(base_url) = env_non_empty(ENV_API_BASE_URL) {
        return normalize_base_url(&base_url).map(|normalized| (normalized, ENV_API_BASE_URL));
    }
    normalize_base_url(DEFAULT_API_BASE_URL).map(|normalized| (normalized, "default_local"))
}

pub fn normalize_base_url(raw: &str) -> Result<String, AuthInputError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AuthInputError::EmptyBaseUrl);
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(AuthInputError::InvalidBaseUrl);
    }
    let Some((_, remainder)) = trimmed.split_once("://") else {
        return Err(AuthInputError::InvalidBaseUrl);
    };
    if remainder.trim().is_empty() || remainder.starts_with('/') {
        return Err(AuthInputError::InvalidBaseUrl);
    }
    Ok(trimmed.to_string())
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().trim_end_matches('/').to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn with_env<T>(value: Option<&str>, test: impl FnOnce() -> T) -> T {
        let lock = ENV_LOCK.get_or_init(|| Mutex::new(()));
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let previous = std::env::var(ENV_API_BASE_URL).ok();
        if let Some(value) = value {
            unsafe { std::env::set_var(ENV_API_BASE_URL, value) };
        } else {
            unsafe { std::env::remove_var(ENV_API_BASE_URL) };
        }

        let result = test();

        if let Some(value) = previous {
            unsafe { std::env::set_var(ENV_API_BASE_URL, value) };
        } else {
            unsafe { std::env::remove_var(ENV_API_BASE_URL) };
        }
        result
    }

    #[test]
    fn normalize_base_url_trims_and_drops_trailing_slash() {
        let normalized =
            normalize_base_url(" https://support.example.com/api/v1/ ").expect("valid base url");
        assert_eq!(normalized, "https://support.example.com/api/v1");
    }

    #[test]
    fn normalize_base_url_requires_scheme_and_host() {
        assert_eq!(
            normalize_base_url("support.example.com"),
            Err(AuthInputError::InvalidBaseUrl)
        );
        assert_eq!(
            normalize_base_url("https:///api"),
            Err(AuthInputError::InvalidBaseUrl)
        );
        assert_eq!(normalize_base_url("  "), Err(AuthInputError::EmptyBaseUrl));
    }

    #[test]
    fn for_origin_mounts_api_prefix() {
        let config = ClientConfig::for_origin("https://desk.example.com/").expect("origin");
        assert_eq!(config.base_url, "https://desk.example.com/api/v1");
        assert_eq!(config.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
    }

    #[test]
    fn timeout_has_a_floor() {
        let config = ClientConfig::new("http://localhost:8000")
            .expect("config")
            .with_timeout_ms(10);
        assert_eq!(config.request_timeout_ms, MIN_REQUEST_TIMEOUT_MS);
    }

    #[test]
    fn resolve_defaults_to_local_server() {
        with_env(None, || {
            let (resolved, source) = resolve_api_base_url().expect("default url");
            assert_eq!(resolved, DEFAULT_API_BASE_URL);
            assert_eq!(source, "default_local");
        });
    }

    #[test]
    fn resolve_prefers_env_override() {
        with_env(Some("https://staging.example.com/api/v1/"), || {
            let (config, source) = ClientConfig::from_env().expect("env url");
            assert_eq!(config.base_url, "https://staging.example.com/api/v1");
            assert_eq!(source, ENV_API_BASE_URL);
        });
    }
}
