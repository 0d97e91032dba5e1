//! Region-scoped drill-down over the regional statistics.
//!
//! The breadcrumb stack decides the next `by-region/detailed` query. An admin
//! restricted to a region subtree gets a pinned floor crumb: navigation never
//! goes above it and the root crumb is not offered. Every transition issues a
//! ticket with a fresh generation; responses carrying an older generation
//! are dropped so a slow answer can't overwrite a newer selection.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::api::stats::RegionalQuery;
use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::models::{Admin, RegionStatsItem, RegionalStats};
use crate::types::RegionLevel;

/// Source of aggregated per-region statistics
#[async_trait]
pub trait RegionalStatsSource: Send + Sync {
    async fn regional_stats(&self, query: &RegionalQuery) -> ClientResult<RegionalStats>;
}

#[async_trait]
impl RegionalStatsSource for ApiClient {
    async fn regional_stats(&self, query: &RegionalQuery) -> ClientResult<RegionalStats> {
        ApiClient::regional_stats(self, query).await
    }
}

/// One breadcrumb: a directory node and its own level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub id: String,
    pub name: String,
    pub level: RegionLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrillError {
    #[error("{0} level has nothing below it")]
    Terminal(RegionLevel),
    #[error("item '{0}' has no id to drill into")]
    MissingId(String),
}

/// A fetch to perform for a given state of the composer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: RegionalQuery,
}

#[derive(Debug, Clone, Default)]
pub struct DrillDown {
    floor: Option<Crumb>,
    stack: Vec<Crumb>,
    generation: u64,
    latest: Option<RegionalStats>,
}

impl DrillDown {
    /// Unrestricted composer starting at the top level
    pub fn new() -> Self {
        Self::default()
    }

    /// Composer pinned at `floor`
    pub fn scoped(floor: Crumb) -> Self {
        Self {
            floor: Some(floor),
            ..Self::default()
        }
    }

    /// Composer for what `admin` may see; owners are never pinned
    pub fn for_admin(admin: &Admin) -> Self {
        if admin.is_owner() {
            return Self::new();
        }
        let floor = admin.assigned_region.as_ref().and_then(|assigned| {
            let id = assigned.region_id()?;
            let name = assigned
                .region
                .as_ref()
                .and_then(|r| r.name())
                .unwrap_or(id)
                .to_string();
            Some(Crumb {
                id: id.to_string(),
                name,
                level: assigned.region_type,
            })
        });
        match floor {
            Some(floor) => Self::scoped(floor),
            None => Self::new(),
        }
    }

    pub fn floor(&self) -> Option<&Crumb> {
        self.floor.as_ref()
    }

    /// Whether the "all regions" root crumb may be shown
    pub fn offers_root(&self) -> bool {
        self.floor.is_none()
    }

    /// Crumbs shown to the user, floor first
    pub fn breadcrumbs(&self) -> Vec<&Crumb> {
        self.floor.iter().chain(self.stack.iter()).collect()
    }

    /// Node the current view is scoped to
    pub fn current(&self) -> Option<&Crumb> {
        self.stack.last().or(self.floor.as_ref())
    }

    /// Level of the items the current view lists
    pub fn items_level(&self) -> RegionLevel {
        match self.current() {
            None => RegionLevel::Region,
            Some(c) => c.level.child().unwrap_or(c.level),
        }
    }

    /// Street level lists a flat table; nothing can be drilled into
    pub fn is_terminal(&self) -> bool {
        self.items_level().is_terminal()
    }

    pub fn query(&self) -> RegionalQuery {
        match self.current() {
            None => RegionalQuery::default(),
            Some(c) => RegionalQuery::scoped(c.id.clone(), c.level),
        }
    }

    // Every ticket invalidates the shown data until its own result lands
    fn issue(&mut self) -> FetchTicket {
        self.generation += 1;
        self.latest = None;
        FetchTicket {
            generation: self.generation,
            query: self.query(),
        }
    }

    /// Ticket for (re)loading the current view
    pub fn refresh(&mut self) -> FetchTicket {
        self.issue()
    }

    /// Scope the view to `item`, one level deeper
    pub fn drill_down(&mut self, item: &RegionStatsItem) -> Result<FetchTicket, DrillError> {
        let level = self.items_level();
        if self.is_terminal() {
            return Err(DrillError::Terminal(level));
        }
        let id = item
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DrillError::MissingId(item.name.clone()))?;

        self.stack.push(Crumb {
            id: id.to_string(),
            name: item.name.clone(),
            level,
        });
        Ok(self.issue())
    }

    /// Jump back to the crumb at `index` of `breadcrumbs()`, or to the root
    /// for `None`. Never goes above the floor. Returns `None` when the state
    /// does not change.
    pub fn breadcrumb_click(&mut self, index: Option<usize>) -> Option<FetchTicket> {
        let floor_len = usize::from(self.floor.is_some());
        let visible = floor_len + self.stack.len();
        let keep = index.map_or(0, |i| i + 1).clamp(floor_len, visible);
        let keep_stack = keep - floor_len;
        if keep_stack == self.stack.len() {
            return None;
        }
        self.stack.truncate(keep_stack);
        Some(self.issue())
    }

    /// Whether `generation` belongs to the latest issued ticket
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Store the result of a fetch. Stale results are dropped and reported
    /// as `Ok(false)`; a failed current fetch leaves the view empty.
    pub fn apply(&mut self, generation: u64, result: ClientResult<RegionalStats>) -> ClientResult<bool> {
        if !self.is_current(generation) {
            debug!(generation, current = self.generation, "dropping stale regional stats");
            return Ok(false);
        }
        self.latest = Some(result?);
        Ok(true)
    }

    pub fn latest(&self) -> Option<&RegionalStats> {
        self.latest.as_ref()
    }

    /// Run one ticket against `source` and apply the result
    pub async fn load<S>(&mut self, source: &S, ticket: FetchTicket) -> ClientResult<bool>
    where
        S: RegionalStatsSource + ?Sized,
    {
        let result = source.regional_stats(&ticket.query).await;
        self.apply(ticket.generation, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::models::AssignedRegion;
    use crate::types::Role;

    fn item(id: &str) -> RegionStatsItem {
        RegionStatsItem {
            id: Some(id.into()),
            name: id.to_uppercase(),
            requests: 1,
            service_reports: 0,
            msk_orders: 0,
            total: 1,
        }
    }

    fn stats(level: RegionLevel, ids: &[&str]) -> RegionalStats {
        RegionalStats {
            level: Some(level),
            items: ids.iter().map(|id| item(id)).collect(),
            regions: Vec::new(),
        }
    }

    fn admin(role: Role, assigned: Option<AssignedRegion>) -> Admin {
        Admin {
            id: "a1".into(),
            phone: "+998901234567".into(),
            alias: None,
            first_name: None,
            last_name: None,
            is_active: true,
            role,
            assigned_region: assigned,
            permissions: Default::default(),
        }
    }

    #[test]
    fn root_queries_top_level() {
        let dd = DrillDown::new();
        assert_eq!(dd.items_level(), RegionLevel::Region);
        assert_eq!(dd.query(), RegionalQuery::default());
        assert!(dd.offers_root());
    }

    #[test]
    fn drilling_walks_down_to_the_terminal_level() {
        let mut dd = DrillDown::new();
        let t = dd.drill_down(&item("r1")).unwrap();
        assert_eq!(t.query, RegionalQuery::scoped("r1", RegionLevel::Region));
        assert_eq!(dd.items_level(), RegionLevel::District);

        dd.drill_down(&item("d1")).unwrap();
        let t = dd.drill_down(&item("n1")).unwrap();
        assert_eq!(t.query, RegionalQuery::scoped("n1", RegionLevel::Neighborhood));
        assert!(dd.is_terminal());
        assert_eq!(dd.drill_down(&item("s1")), Err(DrillError::Terminal(RegionLevel::Street)));
        assert_eq!(dd.breadcrumbs().len(), 3);
    }

    #[test]
    fn breadcrumb_click_truncates_the_stack() {
        let mut dd = DrillDown::new();
        for id in ["r1", "d1", "n1"] {
            dd.drill_down(&item(id)).unwrap();
        }
        let ticket = dd.breadcrumb_click(Some(0)).unwrap();
        assert_eq!(dd.breadcrumbs().len(), 1);
        assert_eq!(ticket.query, RegionalQuery::scoped("r1", RegionLevel::Region));

        let ticket = dd.breadcrumb_click(None).unwrap();
        assert!(dd.breadcrumbs().is_empty());
        assert_eq!(ticket.query, RegionalQuery::default());
        assert_eq!(dd.breadcrumb_click(None), None);
    }

    #[test]
    fn item_without_id_cannot_be_drilled() {
        let mut dd = DrillDown::new();
        let mut nameless = item("x");
        nameless.id = None;
        assert!(matches!(dd.drill_down(&nameless), Err(DrillError::MissingId(_))));
        assert!(dd.breadcrumbs().is_empty());
    }

    #[test]
    fn assigned_district_pins_the_floor() {
        let admin = admin(Role::Admin, Some(AssignedRegion::new("d1", RegionLevel::District)));
        let mut dd = DrillDown::for_admin(&admin);
        assert!(!dd.offers_root());
        assert_eq!(dd.items_level(), RegionLevel::Neighborhood);
        assert_eq!(dd.query(), RegionalQuery::scoped("d1", RegionLevel::District));

        dd.drill_down(&item("n1")).unwrap();
        assert_eq!(dd.breadcrumbs().len(), 2);

        let ticket = dd.breadcrumb_click(None).unwrap();
        assert_eq!(dd.breadcrumbs().len(), 1);
        assert_eq!(ticket.query, RegionalQuery::scoped("d1", RegionLevel::District));
        assert_eq!(dd.breadcrumb_click(None), None);
    }

    #[test]
    fn street_assignment_is_terminal_from_the_start() {
        let admin = admin(Role::Admin, Some(AssignedRegion::new("s1", RegionLevel::Street)));
        let dd = DrillDown::for_admin(&admin);
        assert!(dd.is_terminal());
        assert_eq!(dd.query(), RegionalQuery::scoped("s1", RegionLevel::Street));
    }

    #[test]
    fn owners_are_never_pinned() {
        let owner = admin(Role::Owner, Some(AssignedRegion::new("d1", RegionLevel::District)));
        assert!(DrillDown::for_admin(&owner).offers_root());
    }

    #[test]
    fn stale_responses_are_dropped() {
        let mut dd = DrillDown::new();
        let first = dd.refresh();
        let second = dd.drill_down(&item("r1")).unwrap();

        assert!(!dd.apply(first.generation, Ok(stats(RegionLevel::Region, &["r1", "r2"]))).unwrap());
        assert!(dd.latest().is_none());

        assert!(dd.apply(second.generation, Ok(stats(RegionLevel::District, &["d1"]))).unwrap());
        assert_eq!(dd.latest().unwrap().entries().len(), 1);
    }

    #[test]
    fn failed_fetch_after_drilling_leaves_the_view_empty() {
        let mut dd = DrillDown::new();
        let root = dd.refresh();
        assert!(dd.apply(root.generation, Ok(stats(RegionLevel::Region, &["r1", "r2"]))).unwrap());

        let ticket = dd.drill_down(&item("r1")).unwrap();
        assert!(dd.latest().is_none());

        let failed = Err(ClientError::Api { status: 500, message: None });
        assert!(dd.apply(ticket.generation, failed).is_err());
        assert_eq!(dd.items_level(), RegionLevel::District);
        assert!(dd.latest().is_none());
    }

    struct Fixed(RegionalStats);

    #[async_trait]
    impl RegionalStatsSource for Fixed {
        async fn regional_stats(&self, _query: &RegionalQuery) -> ClientResult<RegionalStats> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn load_applies_the_current_ticket() {
        let source = Fixed(stats(RegionLevel::Region, &[]));
        let mut dd = DrillDown::new();
        let ticket = dd.refresh();
        assert!(dd.load(&source, ticket).await.unwrap());
        assert!(dd.latest().unwrap().entries().is_empty());
    }
}
