use std::rc::Rc;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::SessionStoreError;
use crate::models::UserRecord;

/// The persisted token/user pair. Either slot may be missing after a partial
/// write or a corrupt user record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "accessToken", default)]
    pub access_token: Option<String>,
    #[serde(rename = "currentUser", default)]
    pub current_user: Option<UserRecord>,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
            && self.current_user.is_some()
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.current_user.as_ref().and_then(UserRecord::display_name)
    }
}

/// Durable home of the session. Expiry is never checked here; the HTTP
/// client discovers it from a 401.
pub trait SessionStore {
    fn get(&self) -> Session;
    fn set(&self, access_token: &str, user: Option<&UserRecord>) -> Result<(), SessionStoreError>;
    fn clear(&self) -> Result<(), SessionStoreError>;
}

impl<S: SessionStore + ?Sized> SessionStore for Rc<S> {
    fn get(&self) -> Session {
        (**self).get()
    }

    fn set(&self, access_token: &str, user: Option<&UserRecord>) -> Result<(), SessionStoreError> {
        (**self).set(access_token, user)
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        (**self).clear()
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Session>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_session(access_token: &str, user: UserRecord) -> Self {
        Self {
            session: Mutex::new(Session {
                access_token: Some(access_token.to_string()),
                current_user: Some(user),
            }),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Session {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, access_token: &str, user: Option<&UserRecord>) -> Result<(), SessionStoreError> {
        let mut session = self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        session.access_token = Some(access_token.to_string());
        session.current_user = user.cloned();
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        let mut session = self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *session = Session::default();
        Ok(())
    }
}

/// Decodes the user slot; a corrupt record reads as absent rather than failing.
#[must_use]
pub fn decode_user_slot(raw: Option<&str>) -> Option<UserRecord> {
    let raw = raw?.trim();
    if raw.is_empty() || raw == "null" {
        return None;
    }
    match serde_json::from_str(raw) {
        Ok(user) => Some(user),
        Err(error) => {
            tracing::warn!(error = %error, "discarding unreadable persisted user record");
            None
        }
    }
}

pub fn encode_user_slot(user: &UserRecord) -> Result<String, SessionStoreError> {
    serde_json::to_string(user).map_err(|error| SessionStoreError::Serialize {
        message: error.to_string(),
    })
}
