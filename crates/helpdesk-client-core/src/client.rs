use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::endpoints::Endpoints;
use crate::error::ApiError;
use crate::models::RefreshResponse;
use crate::session::{Session, SessionStore};
use crate::transport::{FilePart, HttpRequest, HttpResponse, HttpTransport};

/// A successful response body, parsed by its declared content type.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Json(serde_json::Value),
    Text(String),
}

impl ResponseBody {
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let value = match self {
            Self::Empty => serde_json::Value::Null,
            Self::Json(value) => value,
            Self::Text(text) => {
                return Err(ApiError::Decode {
                    message: format!("expected JSON response, got text: {text}"),
                });
            }
        };
        serde_json::from_value(value).map_err(|error| ApiError::Decode {
            message: error.to_string(),
        })
    }
}

/// HTTP client bound to one transport, one session store and one API base.
///
/// Every call made through [`ApiClient::request`] carries the bearer token
/// from the store. A 401 on an authenticated call triggers exactly one
/// refresh; concurrent 401s each refresh independently.
#[derive(Debug)]
pub struct ApiClient<T, S> {
    transport: T,
    store: S,
    endpoints: Endpoints,
}

impl<T: HttpTransport, S: SessionStore> ApiClient<T, S> {
    pub fn new(config: &ClientConfig, transport: T, store: S) -> Self {
        Self {
            transport,
            store,
            endpoints: Endpoints::from_config(config),
        }
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.store.get()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        self.endpoints.url(path)
    }

    pub async fn request(&self, request: HttpRequest) -> Result<ResponseBody, ApiError> {
        let token = self.bearer_token();
        let response = self.send(&prepare(&request, token.as_deref())).await?;

        if response.status == 401 && token.is_some() {
            tracing::debug!(url = %request.url, "access token rejected; refreshing");
            if !self.refresh().await {
                // A sibling request may have rotated the token while this
                // refresh was in flight; its token is still good to retry with.
                let current = self.bearer_token();
                if current.is_none() || current == token {
                    self.expire_session();
                    return Err(ApiError::AuthExpired);
                }
                tracing::debug!(url = %request.url, "refresh rejected; retrying with rotated token");
            }
            let token = self.bearer_token();
            let retried = self.send(&prepare(&request, token.as_deref())).await?;
            return parse_response(retried);
        }

        parse_response(response)
    }

    /// Asks the server for a new access token using the refresh cookie.
    ///
    /// Returns `false` on any failure and leaves the session untouched.
    pub async fn refresh(&self) -> bool {
        let request = HttpRequest::post(self.url(Endpoints::refresh_path()));
        let response = match self.transport.send(&request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(error = %error, "token refresh transport failed");
                return false;
            }
        };
        if !response.is_success() {
            tracing::debug!(status = response.status, "token refresh rejected");
            return false;
        }
        let refreshed = match serde_json::from_str::<RefreshResponse>(&response.body) {
            Ok(refreshed) if !refreshed.access.trim().is_empty() => refreshed,
            Ok(_) => {
                tracing::warn!("token refresh returned an empty access token");
                return false;
            }
            Err(error) => {
                tracing::warn!(error = %error, "token refresh response was not decodable");
                return false;
            }
        };
        let session = self.store.get();
        if let Err(error) = self
            .store
            .set(&refreshed.access, session.current_user.as_ref())
        {
            tracing::error!(error = %error, "failed to persist refreshed access token");
            return false;
        }
        true
    }

    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.request(HttpRequest::get(self.url(path)))
            .await?
            .decode()
    }

    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(HttpRequest::post_json(self.url(path), body)?)
            .await?
            .decode()
    }

    pub async fn post_empty(&self, path: &str) -> Result<ResponseBody, ApiError> {
        self.request(HttpRequest::post(self.url(path))).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request(HttpRequest::delete(self.url(path))).await?;
        Ok(())
    }

    pub async fn upload(&self, path: &str, part: FilePart) -> Result<ResponseBody, ApiError> {
        self.request(HttpRequest::multipart(self.url(path), vec![part]))
            .await
    }

    /// Drops the persisted session after an unrecoverable 401.
    pub(crate) fn expire_session(&self) {
        tracing::info!("session expired; clearing stored credentials");
        if let Err(error) = self.store.clear() {
            tracing::error!(error = %error, "failed to clear expired session");
        }
    }

    fn bearer_token(&self) -> Option<String> {
        self.store
            .get()
            .access_token
            .filter(|token| !token.trim().is_empty())
    }

    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport.send(request).await.map_err(|error| {
            tracing::error!(
                method = request.method.as_str(),
                url = %request.url,
                error = %error,
                "request failed before a response arrived"
            );
            ApiError::from(error)
        })
    }
}

/// Defaults first, caller headers over them, bearer token last.
fn prepare(request: &HttpRequest, token: Option<&str>) -> HttpRequest {
    let mut prepared = HttpRequest {
        headers: Vec::with_capacity(request.headers.len() + 2),
        ..request.clone()
    };
    if !request.is_multipart() {
        prepared.set_header("Content-Type", "application/json");
    }
    for (name, value) in &request.headers {
        prepared.set_header(name.clone(), value.clone());
    }
    if let Some(token) = token {
        prepared.set_header("Authorization", format!("Bearer {token}"));
    }
    prepared
}

fn parse_response(response: HttpResponse) -> Result<ResponseBody, ApiError> {
    let body = if response.is_json() {
        if response.body.trim().is_empty() {
            ResponseBody::Empty
        } else {
            let value = serde_json::from_str(&response.body).map_err(|error| {
                tracing::warn!(status = response.status, error = %error, "malformed JSON response");
                ApiError::Decode {
                    message: error.to_string(),
                }
            })?;
            ResponseBody::Json(value)
        }
    } else if response.body.is_empty() {
        ResponseBody::Empty
    } else {
        ResponseBody::Text(response.body)
    };

    if !(200..=299).contains(&response.status) {
        let body = match body {
            ResponseBody::Empty => String::new(),
            ResponseBody::Json(value) => value.to_string(),
            ResponseBody::Text(text) => text,
        };
        tracing::debug!(status = response.status, body = %body, "request returned an error status");
        return Err(ApiError::Http {
            status: response.status,
            body,
        });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::UserRecord;
    use crate::session::MemorySessionStore;
    use crate::testing::MockTransport;
    use crate::transport::{HttpMethod, RequestBody};

    fn user() -> UserRecord {
        UserRecord {
            username: Some("ada".to_string()),
            email: Some("ada@example.com".to_string()),
            ..UserRecord::default()
        }
    }

    fn client(store: MemorySessionStore) -> ApiClient<MockTransport, MemorySessionStore> {
        let config = ClientConfig::new("http://localhost:8000/api/v1").expect("config");
        ApiClient::new(&config, MockTransport::new(), store)
    }

    #[tokio::test]
    async fn request_merges_default_caller_and_bearer_headers() {
        let client = client(MemorySessionStore::with_session("tok-1", user()));
        client
            .transport()
            .respond_json(HttpMethod::Get, "/my-orders/", 200, &json!([]));

        let request = HttpRequest::get(client.url("/my-orders/"))
            .with_header("Accept", "application/json")
            .with_header("content-type", "text/plain");
        let body = client.request(request).await.expect("orders");
        assert_eq!(body, ResponseBody::Json(json!([])));

        let sent = client.transport().requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].header("Content-Type"), Some("text/plain"));
        assert_eq!(sent[0].header("Accept"), Some("application/json"));
        assert_eq!(sent[0].header("Authorization"), Some("Bearer tok-1"));
    }

    #[tokio::test]
    async fn anonymous_requests_carry_no_bearer() {
        let client = client(MemorySessionStore::new());
        client
            .transport()
            .respond_json(HttpMethod::Get, "/my-orders/", 401, &json!({"detail": "no"}));

        let error = client
            .get_json::<serde_json::Value>("/my-orders/")
            .await
            .expect_err("401 without token is a plain http error");
        assert_eq!(error.status(), Some(401));
        assert_eq!(client.transport().requests()[0].header("Authorization"), None);
        assert_eq!(client.transport().count(HttpMethod::Post, "/users/auth/refresh/"), 0);
    }

    #[tokio::test]
    async fn multipart_requests_leave_content_type_to_the_transport() {
        let client = client(MemorySessionStore::with_session("tok-1", user()));
        client.transport().respond_json(
            HttpMethod::Post,
            "/tickets/t-1/attachments/",
            201,
            &json!({"id": 7}),
        );
        client
            .upload(
                "/tickets/t-1/attachments/",
                FilePart::attachment("log.txt", None, b"boom".to_vec()),
            )
            .await
            .expect("upload");
        let sent = client.transport().requests();
        assert_eq!(sent[0].header("Content-Type"), None);
        assert!(matches!(sent[0].body, RequestBody::Multipart(ref parts) if parts.len() == 1));
    }

    #[tokio::test]
    async fn unauthorized_request_is_retried_once_after_refresh() {
        let client = client(MemorySessionStore::with_session("stale", user()));
        let transport = client.transport();
        transport
            .respond_json(HttpMethod::Get, "/my-tickets/", 401, &json!({"detail": "expired"}))
            .respond_json(HttpMethod::Get, "/my-tickets/", 200, &json!([{"id": "t-1"}]));
        transport.respond_json(
            HttpMethod::Post,
            "/users/auth/refresh/",
            200,
            &json!({"access": "fresh"}),
        );

        let tickets: Vec<serde_json::Value> =
            client.get_json("/my-tickets/").await.expect("tickets");
        assert_eq!(tickets.len(), 1);

        let attempts = transport.requests_to(HttpMethod::Get, "/my-tickets/");
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].header("Authorization"), Some("Bearer stale"));
        assert_eq!(attempts[1].header("Authorization"), Some("Bearer fresh"));

        let refresh = transport.requests_to(HttpMethod::Post, "/users/auth/refresh/");
        assert_eq!(refresh.len(), 1);
        assert_eq!(refresh[0].header("Authorization"), None);

        let session = client.session();
        assert_eq!(session.access_token.as_deref(), Some("fresh"));
        assert_eq!(session.current_user, Some(user()));
    }

    #[tokio::test]
    async fn second_unauthorized_after_refresh_is_not_retried_again() {
        let client = client(MemorySessionStore::with_session("stale", user()));
        client
            .transport()
            .respond_json(HttpMethod::Get, "/my-tickets/", 401, &json!({"detail": "no"}));
        client.transport().respond_json(
            HttpMethod::Post,
            "/users/auth/refresh/",
            200,
            &json!({"access": "fresh"}),
        );

        let error = client
            .get_json::<serde_json::Value>("/my-tickets/")
            .await
            .expect_err("still unauthorized");
        assert_eq!(error.status(), Some(401));
        assert_eq!(client.transport().count(HttpMethod::Get, "/my-tickets/"), 2);
        assert_eq!(client.transport().count(HttpMethod::Post, "/users/auth/refresh/"), 1);
    }

    #[tokio::test]
    async fn failed_refresh_expires_the_session() {
        let client = client(MemorySessionStore::with_session("stale", user()));
        client
            .transport()
            .respond_json(HttpMethod::Get, "/my-tickets/", 401, &json!({"detail": "no"}));
        client.transport().respond_json(
            HttpMethod::Post,
            "/users/auth/refresh/",
            401,
            &json!({"detail": "refresh token expired"}),
        );

        let error = client
            .get_json::<serde_json::Value>("/my-tickets/")
            .await
            .expect_err("auth expired");
        assert!(error.is_auth_expired());
        assert_eq!(client.session(), Session::default());
        assert_eq!(client.transport().count(HttpMethod::Get, "/my-tickets/"), 1);
    }

    #[tokio::test]
    async fn refresh_failure_leaves_state_untouched() {
        let client = client(MemorySessionStore::with_session("tok", user()));
        client
            .transport()
            .fail(HttpMethod::Post, "/users/auth/refresh/", "offline");
        assert!(!client.refresh().await);
        assert_eq!(client.session().access_token.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn network_failure_surfaces_as_network_error() {
        let client = client(MemorySessionStore::with_session("tok", user()));
        client
            .transport()
            .fail(HttpMethod::Get, "/my-orders/", "connection refused");
        let error = client
            .get_json::<serde_json::Value>("/my-orders/")
            .await
            .expect_err("network");
        assert!(error.is_network());
    }

    #[test]
    fn parse_response_by_content_type() {
        assert_eq!(
            parse_response(HttpResponse::json(204, "")).expect("empty"),
            ResponseBody::Empty
        );
        assert_eq!(
            parse_response(HttpResponse::text(200, "ok")).expect("text"),
            ResponseBody::Text("ok".to_string())
        );
        let error = parse_response(HttpResponse::json(400, r#"{"email": ["Taken."]}"#))
            .expect_err("http error");
        assert_eq!(
            error,
            ApiError::Http {
                status: 400,
                body: r#"{"email":["Taken."]}"#.to_string()
            }
        );
        assert!(matches!(
            parse_response(HttpResponse::json(200, "{not json")),
            Err(ApiError::Decode { .. })
        ));
    }
}
