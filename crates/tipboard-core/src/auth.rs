//! Simulated sign-in.
//!
//! There is no credential check. An email on the configured allow-list is
//! an admin, anyone else is a plain viewer. The session is persisted next to
//! the records under [`SESSION_KEY`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::storage::KeyValueStorage;
use crate::store::{RecordStore, SESSION_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Decide the role for `email`. Comparison ignores case.
pub fn login(email: &str, admin_emails: &[String]) -> Session {
    let lowered = email.to_lowercase();
    let role = if admin_emails.iter().any(|a| a.to_lowercase() == lowered) {
        Role::Admin
    } else {
        Role::User
    };
    Session {
        email: email.to_string(),
        role,
    }
}

pub fn is_admin(session: Option<&Session>) -> bool {
    session.is_some_and(Session::is_admin)
}

impl<S: KeyValueStorage> RecordStore<S> {
    /// Read the stored session. An unreadable session is removed.
    pub fn load_session(&mut self) -> Result<Option<Session>> {
        let Some(raw) = self
            .storage()
            .get(SESSION_KEY)
            .context("reading stored session")?
        else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(error = %e, "discarding unreadable session");
                self.clear_session()?;
                Ok(None)
            }
        }
    }

    pub fn save_session(&mut self, session: &Session) -> Result<()> {
        let blob = serde_json::to_string(session).context("serializing session")?;
        self.storage_mut()
            .set(SESSION_KEY, &blob)
            .context("writing session")?;
        info!(email = %session.email, role = ?session.role, "signed in");
        Ok(())
    }

    pub fn clear_session(&mut self) -> Result<()> {
        self.storage_mut()
            .remove(SESSION_KEY)
            .context("clearing session")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn admins() -> Vec<String> {
        vec!["Boss@Example.com".to_string()]
    }

    #[test]
    fn allow_listed_email_is_admin_regardless_of_case() {
        let session = login("boss@example.COM", &admins());
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.email, "boss@example.COM");
        assert!(is_admin(Some(&session)));
    }

    #[test]
    fn other_emails_are_users() {
        let session = login("fan@example.com", &admins());
        assert_eq!(session.role, Role::User);
        assert!(!is_admin(Some(&session)));
    }

    #[test]
    fn nobody_signed_in_is_not_admin() {
        assert!(!is_admin(None));
    }

    #[test]
    fn session_wire_shape() {
        let json = serde_json::to_string(&login("fan@example.com", &admins())).unwrap();
        assert_eq!(json, r#"{"email":"fan@example.com","role":"user"}"#);
    }

    #[test]
    fn session_persists_and_clears() {
        let mut store = RecordStore::new(MemoryStorage::new());
        assert!(store.load_session().unwrap().is_none());

        let session = login("boss@example.com", &admins());
        store.save_session(&session).unwrap();
        assert_eq!(store.load_session().unwrap(), Some(session));

        store.clear_session().unwrap();
        assert!(store.load_session().unwrap().is_none());
    }

    #[test]
    fn unreadable_session_is_dropped() {
        let storage = MemoryStorage::new().with_entry(SESSION_KEY, "{\"email\":");
        let mut store = RecordStore::new(storage);
        assert!(store.load_session().unwrap().is_none());
        assert!(!store.storage().contains(SESSION_KEY));
    }
}
