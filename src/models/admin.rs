use serde::{Deserialize, Deserializer, Serialize};

use super::reference::EntityRef;
use crate::permission::Permissions;
use crate::types::{RegionLevel, Role};

/// Dashboard staff account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub phone: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub assigned_region: Option<AssignedRegion>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: Permissions,
}

fn default_active() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Admin {
    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }

    /// Name shown in headers: alias, then first name, then "Admin"
    pub fn display_name(&self) -> &str {
        [self.alias.as_deref(), self.first_name.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .unwrap_or("Admin")
    }
}

/// Region subtree an admin is restricted to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedRegion {
    #[serde(default)]
    pub region: Option<EntityRef>,
    pub region_type: RegionLevel,
}

impl AssignedRegion {
    pub fn new(id: impl Into<String>, level: RegionLevel) -> Self {
        Self {
            region: Some(EntityRef::Id(id.into())),
            region_type: level,
        }
    }

    pub fn region_id(&self) -> Option<&str> {
        self.region.as_ref().and_then(EntityRef::resolved_id)
    }
}

/// Body for `POST /api/admins`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminInput {
    pub phone: String,
    pub password: String,
    pub alias: String,
    pub first_name: String,
    pub last_name: String,
}

/// Body for `PUT /api/admins/:id`; the password is sent only when set
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl AdminUpdate {
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = if password.is_empty() {
            None
        } else {
            Some(password.to_string())
        };
        self
    }
}
