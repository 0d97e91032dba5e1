//! Explicit session context.
//!
//! A session is the bearer token plus the profile the backend returned at
//! login. It is loaded once at startup, handed to the API client, and
//! cleared on logout or when any request answers 401.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ClientError, ClientResult};
use crate::models::Admin;

pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: Admin,
}

impl Session {
    pub fn new(token: impl Into<String>, user: Admin) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}

/// File-backed session storage
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store `session.json` inside `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> ClientResult<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let session: Session = serde_json::from_str(&content)?;
        Ok(Some(session))
    }

    /// Stored session, or `NotAuthenticated` when there is none
    pub fn require(&self) -> ClientResult<Session> {
        self.load()?.ok_or(ClientError::NotAuthenticated)
    }

    pub fn save(&self, session: &Session) -> ClientResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;
        info!(admin = %session.user.id, "session saved");
        Ok(())
    }

    /// Remove the stored session; clearing an absent session is not an error
    pub fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn admin() -> Admin {
        serde_json::from_value(json!({
            "_id": "a1",
            "phone": "+998901234567",
            "role": "admin",
            "assignedRegion": { "region": "d1", "regionType": "district" },
            "permissions": { "requests": { "access": "read", "allowedTypes": ["t1"] } }
        }))
        .unwrap()
    }

    #[test]
    fn save_load_clear_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        assert!(store.load().unwrap().is_none());
        assert!(matches!(store.require(), Err(ClientError::NotAuthenticated)));

        store.save(&Session::new("tok", admin())).unwrap();
        let loaded = store.require().unwrap();
        assert_eq!(loaded.token, "tok");
        assert_eq!(loaded.user.assigned_region.unwrap().region_id(), Some("d1"));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_session_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.load(), Err(ClientError::Decode(_))));
    }
}
