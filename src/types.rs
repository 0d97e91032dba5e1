/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Level of a node in the region directory.
///
/// The directory is a fixed four-level chain: region -> district ->
/// neighborhood -> street. Every level-progression question (what is fetched
/// below a level, which level owns a parent link) is answered from `ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionLevel {
    Region,
    District,
    Neighborhood,
    Street,
}

impl RegionLevel {
    /// Top-down order of the directory levels
    pub const ALL: [RegionLevel; 4] = [
        RegionLevel::Region,
        RegionLevel::District,
        RegionLevel::Neighborhood,
        RegionLevel::Street,
    ];

    /// Zero-based depth (region = 0, street = 3)
    pub fn depth(self) -> usize {
        match self {
            RegionLevel::Region => 0,
            RegionLevel::District => 1,
            RegionLevel::Neighborhood => 2,
            RegionLevel::Street => 3,
        }
    }

    pub fn from_depth(depth: usize) -> Option<Self> {
        Self::ALL.get(depth).copied()
    }

    /// The level one below this one, `None` for street
    pub fn child(self) -> Option<Self> {
        Self::from_depth(self.depth() + 1)
    }

    /// The level one above this one, `None` for region
    pub fn parent(self) -> Option<Self> {
        self.depth().checked_sub(1).and_then(Self::from_depth)
    }

    pub fn is_terminal(self) -> bool {
        self.child().is_none()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RegionLevel::Region => "region",
            RegionLevel::District => "district",
            RegionLevel::Neighborhood => "neighborhood",
            RegionLevel::Street => "street",
        }
    }

    /// Display label used by the dashboard (Uzbek)
    pub fn label(self) -> &'static str {
        match self {
            RegionLevel::Region => "Viloyat",
            RegionLevel::District => "Tuman",
            RegionLevel::Neighborhood => "Mahalla",
            RegionLevel::Street => "Ko'cha",
        }
    }
}

impl fmt::Display for RegionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "region" => Ok(RegionLevel::Region),
            "district" => Ok(RegionLevel::District),
            "neighborhood" => Ok(RegionLevel::Neighborhood),
            "street" => Ok(RegionLevel::Street),
            other => Err(format!("unknown region level '{}'", other)),
        }
    }
}

/// Permission-scoped dashboard modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Requests,
    Services,
    Msk,
}

impl Module {
    pub const ALL: [Module; 3] = [Module::Requests, Module::Services, Module::Msk];

    pub fn as_str(self) -> &'static str {
        match self {
            Module::Requests => "requests",
            Module::Services => "services",
            Module::Msk => "msk",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Module::Requests => "Murojaatlar",
            Module::Services => "Servis reportlar",
            Module::Msk => "MSK buyurtmalar",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Module {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requests" => Ok(Module::Requests),
            "services" => Ok(Module::Services),
            "msk" => Ok(Module::Msk),
            other => Err(format!("unknown module '{}'", other)),
        }
    }
}

/// Per-module access level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Off,
    Read,
    #[default]
    Manage,
}

impl AccessLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessLevel::Off => "off",
            AccessLevel::Read => "read",
            AccessLevel::Manage => "manage",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AccessLevel::Off => "O'chirilgan",
            AccessLevel::Read => "Faqat ko'rish",
            AccessLevel::Manage => "To'liq boshqarish",
        }
    }
}

impl FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(AccessLevel::Off),
            "read" => Ok(AccessLevel::Read),
            "manage" => Ok(AccessLevel::Manage),
            other => Err(format!("unknown access level '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    #[default]
    Admin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_progression_follows_the_chain() {
        assert_eq!(RegionLevel::Region.child(), Some(RegionLevel::District));
        assert_eq!(RegionLevel::District.child(), Some(RegionLevel::Neighborhood));
        assert_eq!(RegionLevel::Neighborhood.child(), Some(RegionLevel::Street));
        assert_eq!(RegionLevel::Street.child(), None);

        assert_eq!(RegionLevel::Region.parent(), None);
        assert_eq!(RegionLevel::Street.parent(), Some(RegionLevel::Neighborhood));
        assert!(RegionLevel::Street.is_terminal());
        assert!(!RegionLevel::Region.is_terminal());
    }

    #[test]
    fn level_round_trips_through_its_name() {
        for level in RegionLevel::ALL {
            assert_eq!(level.as_str().parse::<RegionLevel>(), Ok(level));
        }
        assert!("city".parse::<RegionLevel>().is_err());
    }

    #[test]
    fn access_defaults_to_manage() {
        assert_eq!(AccessLevel::default(), AccessLevel::Manage);
        let parsed: AccessLevel = serde_json::from_str("\"read\"").unwrap();
        assert_eq!(parsed, AccessLevel::Read);
    }
}
