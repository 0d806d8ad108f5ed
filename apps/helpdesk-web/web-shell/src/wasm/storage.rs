use helpdesk_client_core::config::{ACCESS_TOKEN_STORAGE_KEY, CURRENT_USER_STORAGE_KEY};
use helpdesk_client_core::models::UserRecord;
use helpdesk_client_core::session::{decode_user_slot, encode_user_slot};
use helpdesk_client_core::{Session, SessionStore, SessionStoreError};
use web_sys::Storage;

/// Session kept in `localStorage` under the two slots the page has always used.
#[derive(Debug, Clone, Copy, Default)]
pub(in crate::wasm) struct LocalStorageSessionStore;

fn local_storage() -> Result<Storage, SessionStoreError> {
    let unavailable = |message: &str| SessionStoreError::Unavailable {
        message: message.to_string(),
    };
    web_sys::window()
        .ok_or_else(|| unavailable("window is unavailable"))?
        .local_storage()
        .map_err(|_| unavailable("failed to access local storage"))?
        .ok_or_else(|| unavailable("local storage is unavailable"))
}

impl SessionStore for LocalStorageSessionStore {
    fn get(&self) -> Session {
        let Ok(storage) = local_storage() else {
            return Session::default();
        };
        let access_token = storage
            .get_item(ACCESS_TOKEN_STORAGE_KEY)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty());
        let raw_user = storage.get_item(CURRENT_USER_STORAGE_KEY).ok().flatten();
        Session {
            access_token,
            current_user: decode_user_slot(raw_user.as_deref()),
        }
    }

    fn set(&self, access_token: &str, user: Option<&UserRecord>) -> Result<(), SessionStoreError> {
        let storage = local_storage()?;
        storage
            .set_item(ACCESS_TOKEN_STORAGE_KEY, access_token)
            .map_err(|_| SessionStoreError::Unavailable {
                message: "failed to persist access token".to_string(),
            })?;
        match user {
            Some(user) => storage
                .set_item(CURRENT_USER_STORAGE_KEY, &encode_user_slot(user)?)
                .map_err(|_| SessionStoreError::Unavailable {
                    message: "failed to persist current user".to_string(),
                }),
            None => {
                let _ = storage.remove_item(CURRENT_USER_STORAGE_KEY);
                Ok(())
            }
        }
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        let storage = local_storage()?;
        let _ = storage.remove_item(ACCESS_TOKEN_STORAGE_KEY);
        let _ = storage.remove_item(CURRENT_USER_STORAGE_KEY);
        Ok(())
    }
}
