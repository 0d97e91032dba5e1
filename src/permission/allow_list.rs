use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::models::EntityRef;

/// Which entities of a module an admin may see.
///
/// Stored by the backend as a plain id list where an empty list means
/// "everything". `Only` therefore never holds an empty set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AllowList {
    #[default]
    Unrestricted,
    Only(BTreeSet<String>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllowListError {
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    // An empty list would read back as unrestricted
    #[error("At least one item must stay selected; turn the module off instead")]
    LastItem,
}

impl AllowList {
    /// Build from the stored representation (empty = unrestricted)
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = ids
            .into_iter()
            .map(Into::into)
            .filter(|id| !id.trim().is_empty())
            .collect();
        if set.is_empty() {
            AllowList::Unrestricted
        } else {
            AllowList::Only(set)
        }
    }

    /// Stored representation, sorted
    pub fn to_ids(&self) -> Vec<String> {
        match self {
            AllowList::Unrestricted => Vec::new(),
            AllowList::Only(set) => set.iter().cloned().collect(),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, AllowList::Unrestricted)
    }

    pub fn allows(&self, id: &str) -> bool {
        match self {
            AllowList::Unrestricted => true,
            AllowList::Only(set) => set.contains(id),
        }
    }

    /// Flip one item on or off.
    ///
    /// Turning an item off while unrestricted materialises the list as every
    /// other item of `all_items`. Turning the last missing item back on
    /// collapses the list to `Unrestricted`.
    pub fn toggle(&self, id: &str, all_items: &[String]) -> Result<AllowList, AllowListError> {
        if !all_items.iter().any(|item| item == id) {
            return Err(AllowListError::UnknownItem(id.to_string()));
        }

        let next: BTreeSet<String> = match self {
            AllowList::Unrestricted => all_items.iter().filter(|item| *item != id).cloned().collect(),
            AllowList::Only(set) if set.contains(id) => {
                let mut next = set.clone();
                next.remove(id);
                next
            }
            AllowList::Only(set) => {
                let mut next = set.clone();
                next.insert(id.to_string());
                next
            }
        };

        if next.is_empty() {
            return Err(AllowListError::LastItem);
        }
        if all_items.iter().all(|item| next.contains(item)) {
            return Ok(AllowList::Unrestricted);
        }
        Ok(AllowList::Only(next))
    }
}

impl Serialize for AllowList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_ids().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AllowList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let refs = Option::<Vec<EntityRef>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(AllowList::from_ids(refs.iter().map(|r| r.id().to_string())))
    }
}
