use serde::{Deserialize, Serialize};

use super::reference::EntityRef;
use crate::types::RegionLevel;

/// A node of the region directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub level: RegionLevel,
    #[serde(default)]
    pub parent: Option<EntityRef>,
}

impl Region {
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_ref().and_then(EntityRef::resolved_id)
    }

    /// A top-level region has no parent; every other level has a parent
    /// exactly one level above it.
    pub fn is_consistent_with(&self, parent: Option<&Region>) -> bool {
        match (self.level.parent(), parent) {
            (None, None) => true,
            (Some(expected), Some(p)) => p.level == expected && self.parent_id() == Some(p.id.as_str()),
            _ => false,
        }
    }
}

/// Body for region create/update
#[derive(Debug, Clone, Serialize)]
pub struct RegionInput {
    pub name: String,
    #[serde(rename = "type")]
    pub level: RegionLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl RegionInput {
    pub fn new(name: impl Into<String>, level: RegionLevel, parent: Option<String>) -> Self {
        Self {
            name: name.into(),
            level,
            parent,
        }
    }
}
