use serde::{Deserialize, Serialize};

use crate::models::AssignedRegion;
use crate::types::RegionLevel;

/// Selected id per directory level, as shown by the cascading picker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionChain {
    pub region_id: Option<String>,
    pub district_id: Option<String>,
    pub neighborhood_id: Option<String>,
    pub street_id: Option<String>,
}

impl RegionChain {
    pub fn get(&self, level: RegionLevel) -> Option<&str> {
        match level {
            RegionLevel::Region => self.region_id.as_deref(),
            RegionLevel::District => self.district_id.as_deref(),
            RegionLevel::Neighborhood => self.neighborhood_id.as_deref(),
            RegionLevel::Street => self.street_id.as_deref(),
        }
    }

    fn slot_mut(&mut self, level: RegionLevel) -> &mut Option<String> {
        match level {
            RegionLevel::Region => &mut self.region_id,
            RegionLevel::District => &mut self.district_id,
            RegionLevel::Neighborhood => &mut self.neighborhood_id,
            RegionLevel::Street => &mut self.street_id,
        }
    }

    /// Write one level without touching the others
    pub(crate) fn fill(&mut self, level: RegionLevel, id: impl Into<String>) {
        *self.slot_mut(level) = Some(id.into());
    }

    /// Picker selection: set `level` and clear every level below it.
    /// A blank id clears the level itself too.
    pub fn select(&mut self, level: RegionLevel, id: Option<&str>) {
        *self.slot_mut(level) = id.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        let mut below = level.child();
        while let Some(l) = below {
            *self.slot_mut(l) = None;
            below = l.child();
        }
    }

    /// Parent id the options of `level` are filtered by
    pub fn parent_for(&self, level: RegionLevel) -> Option<&str> {
        level.parent().and_then(|p| self.get(p))
    }

    pub fn is_empty(&self) -> bool {
        RegionLevel::ALL.iter().all(|l| self.get(*l).is_none())
    }

    /// Deepest selected level and its id
    pub fn deepest(&self) -> Option<(RegionLevel, &str)> {
        RegionLevel::ALL
            .iter()
            .rev()
            .find_map(|l| self.get(*l).map(|id| (*l, id)))
    }

    /// Assignment to save for this selection; `None` lifts the restriction
    pub fn selected(&self) -> Option<AssignedRegion> {
        self.deepest().map(|(level, id)| AssignedRegion::new(id, level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> RegionChain {
        RegionChain {
            region_id: Some("r1".into()),
            district_id: Some("d1".into()),
            neighborhood_id: Some("n1".into()),
            street_id: Some("s1".into()),
        }
    }

    #[test]
    fn selecting_a_level_clears_deeper_levels() {
        let mut chain = full();
        chain.select(RegionLevel::District, Some("d2"));
        assert_eq!(chain.get(RegionLevel::Region), Some("r1"));
        assert_eq!(chain.get(RegionLevel::District), Some("d2"));
        assert_eq!(chain.neighborhood_id, None);
        assert_eq!(chain.street_id, None);
    }

    #[test]
    fn clearing_the_top_level_empties_the_chain() {
        let mut chain = full();
        chain.select(RegionLevel::Region, Some(""));
        assert!(chain.is_empty());
        assert_eq!(chain.selected(), None);
    }

    #[test]
    fn deepest_selection_becomes_the_assignment() {
        let mut chain = full();
        assert_eq!(chain.selected(), Some(AssignedRegion::new("s1", RegionLevel::Street)));
        chain.select(RegionLevel::Neighborhood, None);
        assert_eq!(chain.selected(), Some(AssignedRegion::new("d1", RegionLevel::District)));
        assert_eq!(chain.parent_for(RegionLevel::Neighborhood), Some("d1"));
        assert_eq!(chain.parent_for(RegionLevel::Region), None);
    }
}
