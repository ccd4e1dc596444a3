//! Login gate.
//!
//! One configured operator account, compared as plain strings. The persisted
//! user only lets a restarted shell skip the login screen; it is not a
//! security boundary.

use anyhow::{bail, Context, Result};

use crate::models::User;
use crate::settings::CredentialSettings;
use crate::storage::KeyValueStore;

const ENABLE_LOGS: bool = true;
use crate::{log_info, log_warn};

pub const INVALID_CREDENTIALS: &str = "Invalid username or password. Please try again.";

pub struct SessionGate {
    credentials: CredentialSettings,
    key: String,
}

impl SessionGate {
    pub fn new(credentials: CredentialSettings, key: impl Into<String>) -> Self {
        Self {
            credentials,
            key: key.into(),
        }
    }

    /// The user persisted by an earlier login, if it is still readable.
    pub fn restore(&self, store: &dyn KeyValueStore) -> Option<User> {
        let raw = match store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                log_warn!("Could not read saved session: {err:#}");
                return None;
            }
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) if user.is_authenticated => Some(user),
            Ok(_) => None,
            Err(err) => {
                log_warn!("Ignoring unreadable saved session: {err}");
                None
            }
        }
    }

    pub fn login(&self, store: &dyn KeyValueStore, username: &str, password: &str) -> Result<User> {
        if username != self.credentials.username || password != self.credentials.password {
            bail!(INVALID_CREDENTIALS);
        }

        let user = User::authenticated(username);
        let serialized = serde_json::to_string(&user).context("failed to serialize session")?;
        store
            .set(&self.key, &serialized)
            .context("failed to persist session")?;
        log_info!("User {} logged in", user.username);
        Ok(user)
    }

    pub fn logout(&self, store: &dyn KeyValueStore) -> Result<()> {
        store
            .remove(&self.key)
            .context("failed to clear saved session")?;
        log_info!("User logged out");
        Ok(())
    }
}
