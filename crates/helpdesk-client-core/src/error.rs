use thiserror::Error;

/// No response reached the client (DNS, connection refused, CORS, timeout).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport_failed:{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionStoreError {
    #[error("session_storage_unavailable:{message}")]
    Unavailable { message: String },
    #[error("session_serialize_failed:{message}")]
    Serialize { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network_error:{message}")]
    Network { message: String },
    #[error("http_{status}:{body}")]
    Http { status: u16, body: String },
    /// A 401 whose token refresh also failed; the session has been cleared.
    #[error("auth_expired")]
    AuthExpired,
    #[error("decode_failed:{message}")]
    Decode { message: String },
    #[error("session_store_failed:{message}")]
    Storage { message: String },
}

impl ApiError {
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    #[must_use]
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Serialized response body of an HTTP failure.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Http { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }
}

/// Why one file of a batch upload did not make it to the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// The file could not be read locally, so no request was sent.
    #[error("file_unreadable:{filename}")]
    Unreadable { filename: String },
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        Self::Network {
            message: error.message,
        }
    }
}

impl From<SessionStoreError> for ApiError {
    fn from(error: SessionStoreError) -> Self {
        Self::Storage {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_preserves_shape() {
        let error = ApiError::Http {
            status: 400,
            body: "{\"email\":[\"Enter a valid email address.\"]}".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "http_400:{\"email\":[\"Enter a valid email address.\"]}"
        );
        assert_eq!(error.status(), Some(400));
        assert!(!error.is_network());
    }

    #[test]
    fn transport_failures_become_network_errors() {
        let error: ApiError = TransportError::new("connection refused").into();
        assert!(error.is_network());
        assert_eq!(error.to_string(), "network_error:connection refused");
        assert_eq!(error.body(), None);
    }
}
