//! Per-admin, per-module permissions and their evaluation.
//!
//! Owners see every module. Other admins carry one `ModulePermission` per
//! module: an access level and an allow-list of entities (request types,
//! services or MSK categories).

pub mod allow_list;
pub mod evaluator;

pub use allow_list::{AllowList, AllowListError};
pub use evaluator::{
    can_open, has_module_access, is_entity_allowed, is_managed, stats_tabs, visible_modules, Section, StatsTab,
};

use serde::{Deserialize, Serialize};

use crate::types::{AccessLevel, Module};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModulePermission {
    pub access: AccessLevel,
    pub allowed: AllowList,
}

impl ModulePermission {
    pub fn new(access: AccessLevel, allowed: AllowList) -> Self {
        Self { access, allowed }
    }

    pub fn is_enabled(&self) -> bool {
        self.access != AccessLevel::Off
    }

    /// Module on/off switch: on restores full management
    pub fn set_enabled(&mut self, enabled: bool) {
        self.access = if enabled { AccessLevel::Manage } else { AccessLevel::Off };
    }

    /// Edit-rights switch, only meaningful while the module is enabled
    pub fn set_manage(&mut self, manage: bool) {
        if self.is_enabled() {
            self.access = if manage { AccessLevel::Manage } else { AccessLevel::Read };
        }
    }

    pub fn toggle_item(&mut self, id: &str, all_items: &[String]) -> Result<(), AllowListError> {
        self.allowed = self.allowed.toggle(id, all_items)?;
        Ok(())
    }

    pub fn select_all(&mut self) {
        self.allowed = AllowList::Unrestricted;
    }
}

/// Permissions of one admin across all modules.
///
/// A module missing from the stored profile defaults to full management with
/// no entity restriction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "PermissionsWire", into = "PermissionsWire")]
pub struct Permissions {
    pub requests: ModulePermission,
    pub services: ModulePermission,
    pub msk: ModulePermission,
}

impl Permissions {
    pub fn get(&self, module: Module) -> &ModulePermission {
        match module {
            Module::Requests => &self.requests,
            Module::Services => &self.services,
            Module::Msk => &self.msk,
        }
    }

    pub fn get_mut(&mut self, module: Module) -> &mut ModulePermission {
        match module {
            Module::Requests => &mut self.requests,
            Module::Services => &mut self.services,
            Module::Msk => &mut self.msk,
        }
    }
}

// Stored shape: requests/services use `allowedTypes`, msk uses `allowedCategories`

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PermissionsWire {
    #[serde(default)]
    requests: Option<TypesWire>,
    #[serde(default)]
    services: Option<TypesWire>,
    #[serde(default)]
    msk: Option<CategoriesWire>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypesWire {
    #[serde(default)]
    access: Option<AccessLevel>,
    #[serde(default)]
    allowed_types: AllowList,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoriesWire {
    #[serde(default)]
    access: Option<AccessLevel>,
    #[serde(default)]
    allowed_categories: AllowList,
}

impl From<PermissionsWire> for Permissions {
    fn from(wire: PermissionsWire) -> Self {
        let types = |w: Option<TypesWire>| {
            w.map(|w| ModulePermission::new(w.access.unwrap_or_default(), w.allowed_types))
                .unwrap_or_default()
        };
        Permissions {
            requests: types(wire.requests),
            services: types(wire.services),
            msk: wire
                .msk
                .map(|w| ModulePermission::new(w.access.unwrap_or_default(), w.allowed_categories))
                .unwrap_or_default(),
        }
    }
}

impl From<Permissions> for PermissionsWire {
    fn from(p: Permissions) -> Self {
        PermissionsWire {
            requests: Some(TypesWire {
                access: Some(p.requests.access),
                allowed_types: p.requests.allowed,
            }),
            services: Some(TypesWire {
                access: Some(p.services.access),
                allowed_types: p.services.allowed,
            }),
            msk: Some(CategoriesWire {
                access: Some(p.msk.access),
                allowed_categories: p.msk.allowed,
            }),
        }
    }
}
