use serde::{Deserialize, Serialize};

/// A reference to another backend entity.
///
/// The backend returns references either bare (`"64f..."`) or populated
/// (`{"_id": "64f...", "name": "..."}`) depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
    Id(String),
    Populated {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl EntityRef {
    pub fn id(&self) -> &str {
        match self {
            EntityRef::Id(id) => id,
            EntityRef::Populated { id, .. } => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            EntityRef::Id(_) => None,
            EntityRef::Populated { name, .. } => name.as_deref(),
        }
    }

    /// The referenced id, `None` when blank
    pub fn resolved_id(&self) -> Option<&str> {
        let id = self.id().trim();
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }
}

impl From<&str> for EntityRef {
    fn from(id: &str) -> Self {
        EntityRef::Id(id.to_string())
    }
}

impl From<String> for EntityRef {
    fn from(id: String) -> Self {
        EntityRef::Id(id)
    }
}
