use std::fs;
use std::path::PathBuf;

use crate::api::ApiClient;
use crate::config::config;
use crate::error::ClientError;
use crate::models::Admin;
use crate::permission::{can_open, is_managed, Section};
use crate::session::{Session, SessionStore};
use crate::types::Module;

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("MUROJAAT_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("murojaat").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn session_store() -> anyhow::Result<SessionStore> {
    Ok(SessionStore::new(get_config_dir()?))
}

/// Client without credentials, for login
pub fn anonymous_client() -> anyhow::Result<ApiClient> {
    Ok(ApiClient::new(&config().api.base_url)?)
}

/// Client bound to the stored session; expiry clears the stored session
pub fn authenticated_client() -> anyhow::Result<(ApiClient, Session)> {
    let store = session_store()?;
    let session = match store.require() {
        Ok(session) => session,
        Err(ClientError::NotAuthenticated) => {
            return Err(anyhow::anyhow!("Not logged in, run `murojaat auth login` first"));
        }
        Err(e) => return Err(e.into()),
    };
    let client = ApiClient::new(&config().api.base_url)?
        .with_session(&session)
        .with_session_store(store);
    Ok((client, session))
}

pub fn require_section(admin: &Admin, section: Section) -> anyhow::Result<()> {
    if can_open(admin, section) {
        return Ok(());
    }
    if section.owner_only() {
        Err(anyhow::anyhow!("Only owners can manage this section"))
    } else {
        Err(anyhow::anyhow!("No access to this module"))
    }
}

pub fn require_managed(admin: &Admin, module: Module) -> anyhow::Result<()> {
    if is_managed(admin, module) {
        Ok(())
    } else {
        Err(anyhow::anyhow!("Read-only access to {}", module.title()))
    }
}
