use crate::client::ApiClient;
use crate::endpoints::Endpoints;
use crate::error::ApiError;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, UserRecord};
use crate::session::SessionStore;
use crate::transport::HttpTransport;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthInputError {
    #[error("base url must not be empty")]
    EmptyBaseUrl,
    #[error("base url must use http:// or https:// and include a host")]
    InvalidBaseUrl,
    #[error("Email is required")]
    EmptyEmail,
    #[error("Password is required")]
    EmptyPassword,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthFlowError {
    #[error(transparent)]
    Input(#[from] AuthInputError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Raw values of the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirmation: String,
}

impl RegisterForm {
    /// Checks the confirmation locally and builds the payload; a blank
    /// username is left out.
    pub fn into_request(self) -> Result<RegisterRequest, AuthInputError> {
        if self.password != self.password_confirmation {
            return Err(AuthInputError::PasswordMismatch);
        }
        let username = self.username.trim();
        Ok(RegisterRequest {
            username: (!username.is_empty()).then(|| username.to_string()),
            email: self.email,
            password: self.password,
            password_confirmation: self.password_confirmation,
            first_name: self.first_name,
            last_name: self.last_name,
        })
    }
}

pub fn login_request(email: &str, password: &str) -> Result<LoginRequest, AuthInputError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AuthInputError::EmptyEmail);
    }
    if password.is_empty() {
        return Err(AuthInputError::EmptyPassword);
    }
    Ok(LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// User-facing text for a failed registration, from the serialized error body.
#[must_use]
pub fn register_error_message(body: &str) -> String {
    const PREFIX: &str = "Registration failed. ";
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return format!("{PREFIX}Please try again.");
    };
    let field = |name: &str| value.get(name).filter(|entry| !entry.is_null());
    let first_message = |entry: &serde_json::Value| match entry {
        serde_json::Value::Array(items) => items.first().map(plain_text).unwrap_or_default(),
        other => plain_text(other),
    };

    let detail = if let Some(entry) = field("username") {
        first_message(entry)
    } else if let Some(entry) = field("email") {
        first_message(entry)
    } else if let Some(entry) = field("password") {
        first_message(entry)
    } else if field("first_name").is_some() {
        "First name is required.".to_string()
    } else if field("last_name").is_some() {
        "Last name is required.".to_string()
    } else {
        "Please check your input.".to_string()
    };
    format!("{PREFIX}{detail}")
}

fn plain_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl<T: HttpTransport, S: SessionStore> ApiClient<T, S> {
    pub async fn login(&self, email: &str, password: &str) -> Result<UserRecord, AuthFlowError> {
        let request = login_request(email, password)?;
        let response: AuthResponse = self
            .post_json(Endpoints::login_path(), &request)
            .await
            .inspect_err(|error| tracing::warn!(error = %error, "login failed"))?;
        Ok(self.persist_auth(response)?)
    }

    pub async fn register(&self, form: RegisterForm) -> Result<UserRecord, AuthFlowError> {
        let request = form.into_request()?;
        let response: AuthResponse = self
            .post_json(Endpoints::register_path(), &request)
            .await
            .inspect_err(|error| tracing::warn!(error = %error, "registration failed"))?;
        Ok(self.persist_auth(response)?)
    }

    /// Best-effort server logout; the local session is cleared regardless.
    pub async fn logout(&self) {
        if let Err(error) = self.post_empty(Endpoints::logout_path()).await {
            tracing::debug!(error = %error, "logout request failed; clearing session anyway");
        }
        if let Err(error) = self.store().clear() {
            tracing::error!(error = %error, "failed to clear session on logout");
        }
    }

    fn persist_auth(&self, response: AuthResponse) -> Result<UserRecord, ApiError> {
        let user = response.user.unwrap_or_default();
        self.store().set(&response.access, Some(&user))?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::ClientConfig;
    use crate::session::{MemorySessionStore, Session};
    use crate::testing::MockTransport;
    use crate::transport::{HttpMethod, RequestBody};

    fn client(store: MemorySessionStore) -> ApiClient<MockTransport, MemorySessionStore> {
        let config = ClientConfig::new("http://localhost:8000/api/v1").expect("config");
        ApiClient::new(&config, MockTransport::new(), store)
    }

    fn form() -> RegisterForm {
        RegisterForm {
            email: "ada@example.com".to_string(),
            username: "  ".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password: "s3cret!".to_string(),
            password_confirmation: "s3cret!".to_string(),
        }
    }

    #[test]
    fn login_requires_both_fields() {
        assert_eq!(login_request("  ", "pw"), Err(AuthInputError::EmptyEmail));
        assert_eq!(
            login_request("ada@example.com", ""),
            Err(AuthInputError::EmptyPassword)
        );
        let request = login_request(" ada@example.com ", "pw").expect("request");
        assert_eq!(request.email, "ada@example.com");
    }

    #[test]
    fn register_form_omits_blank_username() {
        let request = form().into_request().expect("request");
        assert_eq!(request.username, None);
        let payload = serde_json::to_value(&request).expect("payload");
        assert!(payload.get("username").is_none());
        assert_eq!(payload["password_confirmation"], "s3cret!");

        let named = RegisterForm {
            username: " ada ".to_string(),
            ..form()
        };
        assert_eq!(
            named.into_request().expect("request").username.as_deref(),
            Some("ada")
        );
    }

    #[test]
    fn register_error_message_follows_field_priority() {
        let body = json!({
            "password": ["This password is too common."],
            "email": ["user with this email already exists."],
        })
        .to_string();
        assert_eq!(
            register_error_message(&body),
            "Registration failed. user with this email already exists."
        );
        assert_eq!(
            register_error_message(&json!({"last_name": ["x"], "first_name": ["y"]}).to_string()),
            "Registration failed. First name is required."
        );
        assert_eq!(
            register_error_message(&json!({"last_name": ["This field is required."]}).to_string()),
            "Registration failed. Last name is required."
        );
        assert_eq!(
            register_error_message(&json!({"detail": "nope"}).to_string()),
            "Registration failed. Please check your input."
        );
        assert_eq!(
            register_error_message("<html>Server Error</html>"),
            "Registration failed. Please try again."
        );
    }

    #[tokio::test]
    async fn login_persists_session() {
        let client = client(MemorySessionStore::new());
        client.transport().respond_json(
            HttpMethod::Post,
            "/users/auth/login/",
            200,
            &json!({"access": "tok", "user": {"id": 1, "username": "ada", "email": "ada@example.com"}}),
        );
        let user = client.login("ada@example.com", "pw").await.expect("login");
        assert_eq!(user.username.as_deref(), Some("ada"));
        let session = client.session();
        assert!(session.is_authenticated());
        assert_eq!(session.access_token.as_deref(), Some("tok"));

        let sent = client.transport().requests();
        assert_eq!(
            sent[0].body,
            RequestBody::Json(r#"{"email":"ada@example.com","password":"pw"}"#.to_string())
        );
    }

    #[tokio::test]
    async fn login_rejection_keeps_store_empty() {
        let client = client(MemorySessionStore::new());
        client.transport().respond_json(
            HttpMethod::Post,
            "/users/auth/login/",
            400,
            &json!({"non_field_errors": ["Invalid credentials"]}),
        );
        let error = client.login("ada@example.com", "bad").await.expect_err("rejected");
        assert!(matches!(error, AuthFlowError::Api(ApiError::Http { status: 400, .. })));
        assert_eq!(client.session(), Session::default());
    }

    #[tokio::test]
    async fn register_mismatch_sends_nothing() {
        let client = client(MemorySessionStore::new());
        let error = client
            .register(RegisterForm {
                password_confirmation: "different".to_string(),
                ..form()
            })
            .await
            .expect_err("mismatch");
        assert_eq!(error, AuthFlowError::Input(AuthInputError::PasswordMismatch));
        assert_eq!(error.to_string(), "Passwords do not match");
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn logout_clears_even_when_server_fails() {
        let client = client(MemorySessionStore::with_session(
            "tok",
            UserRecord {
                username: Some("ada".to_string()),
                ..UserRecord::default()
            },
        ));
        client
            .transport()
            .fail(HttpMethod::Post, "/users/auth/logout/", "offline");
        client.logout().await;
        assert_eq!(client.session(), Session::default());
        assert_eq!(client.transport().count(HttpMethod::Post, "/users/auth/logout/"), 1);
    }
}
