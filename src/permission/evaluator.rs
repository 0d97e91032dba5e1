use crate::models::Admin;
use crate::types::{AccessLevel, Module, Role};

/// Whether the module is visible at all
pub fn has_module_access(admin: &Admin, module: Module) -> bool {
    admin.role == Role::Owner || admin.permissions.get(module).access != AccessLevel::Off
}

/// Whether status mutations are offered (owners always manage)
pub fn is_managed(admin: &Admin, module: Module) -> bool {
    admin.role == Role::Owner || admin.permissions.get(module).access == AccessLevel::Manage
}

/// Whether a single entity of the module is selectable
pub fn is_entity_allowed(admin: &Admin, module: Module, entity_id: &str) -> bool {
    admin.permissions.get(module).allowed.allows(entity_id)
}

/// Modules the admin can open, in dashboard order
pub fn visible_modules(admin: &Admin) -> Vec<Module> {
    Module::ALL
        .into_iter()
        .filter(|m| has_module_access(admin, *m))
        .collect()
}

/// Tabs of the statistics page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsTab {
    Requests,
    Services,
    Msk,
    Regional,
}

impl StatsTab {
    pub const ALL: [StatsTab; 4] = [StatsTab::Requests, StatsTab::Services, StatsTab::Msk, StatsTab::Regional];

    /// Module gating the tab; the regional tab is ungated
    pub fn module(self) -> Option<Module> {
        match self {
            StatsTab::Requests => Some(Module::Requests),
            StatsTab::Services => Some(Module::Services),
            StatsTab::Msk => Some(Module::Msk),
            StatsTab::Regional => None,
        }
    }
}

pub fn stats_tabs(admin: &Admin) -> Vec<StatsTab> {
    StatsTab::ALL
        .into_iter()
        .filter(|t| t.module().map_or(true, |m| has_module_access(admin, m)))
        .collect()
}

/// Top-level dashboard sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Statistics,
    Requests,
    ServiceReports,
    MskOrders,
    Admins,
    RequestTypes,
    Services,
    MskCategories,
    Regions,
}

impl Section {
    /// Directory and staff management is reserved to owners
    pub fn owner_only(self) -> bool {
        matches!(
            self,
            Section::Admins | Section::RequestTypes | Section::Services | Section::MskCategories | Section::Regions
        )
    }

    pub fn module(self) -> Option<Module> {
        match self {
            Section::Requests => Some(Module::Requests),
            Section::ServiceReports => Some(Module::Services),
            Section::MskOrders => Some(Module::Msk),
            _ => None,
        }
    }
}

pub fn can_open(admin: &Admin, section: Section) -> bool {
    if section.owner_only() {
        return admin.role == Role::Owner;
    }
    section.module().map_or(true, |m| has_module_access(admin, m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::{AllowList, Permissions};

    fn admin(role: Role, permissions: Permissions) -> Admin {
        Admin {
            id: "a1".into(),
            phone: "+998901234567".into(),
            alias: Some("test".into()),
            first_name: None,
            last_name: None,
            is_active: true,
            role,
            assigned_region: None,
            permissions,
        }
    }

    fn all_off() -> Permissions {
        let mut p = Permissions::default();
        for m in Module::ALL {
            p.get_mut(m).access = AccessLevel::Off;
        }
        p
    }

    #[test]
    fn owner_sees_every_module_regardless_of_permissions() {
        let owner = admin(Role::Owner, all_off());
        for m in Module::ALL {
            assert!(has_module_access(&owner, m));
            assert!(is_managed(&owner, m));
        }
    }

    #[test]
    fn admin_access_follows_stored_level() {
        let mut p = all_off();
        p.requests.access = AccessLevel::Read;
        p.msk.access = AccessLevel::Manage;
        let a = admin(Role::Admin, p);

        assert!(has_module_access(&a, Module::Requests));
        assert!(!is_managed(&a, Module::Requests));
        assert!(!has_module_access(&a, Module::Services));
        assert!(is_managed(&a, Module::Msk));
        assert_eq!(visible_modules(&a), vec![Module::Requests, Module::Msk]);
    }

    #[test]
    fn entity_allow_list_is_checked() {
        let mut p = Permissions::default();
        p.services.allowed = AllowList::from_ids(["s1"]);
        let a = admin(Role::Admin, p);

        assert!(is_entity_allowed(&a, Module::Services, "s1"));
        assert!(!is_entity_allowed(&a, Module::Services, "s2"));
        assert!(is_entity_allowed(&a, Module::Requests, "anything"));
    }

    #[test]
    fn regional_tab_is_always_visible() {
        let a = admin(Role::Admin, all_off());
        assert_eq!(stats_tabs(&a), vec![StatsTab::Regional]);

        let owner = admin(Role::Owner, all_off());
        assert_eq!(stats_tabs(&owner).len(), 4);
    }

    #[test]
    fn management_sections_need_an_owner() {
        let a = admin(Role::Admin, Permissions::default());
        assert!(!can_open(&a, Section::Regions));
        assert!(!can_open(&a, Section::Admins));
        assert!(can_open(&a, Section::Requests));
        assert!(can_open(&admin(Role::Owner, all_off()), Section::Admins));

        let blocked = admin(Role::Admin, all_off());
        assert!(!can_open(&blocked, Section::MskOrders));
        assert!(can_open(&blocked, Section::Dashboard));
    }
}
