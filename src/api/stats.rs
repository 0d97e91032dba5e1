use futures::join;

use super::{ApiClient, Query};
use crate::error::ClientResult;
use crate::models::{
    CategoryBreakdown, DashboardStats, Heatmap, MskCategoryBreakdown, Period, RegionalStats, ServiceBreakdown, Trends,
};
use crate::types::{Module, RegionLevel};

/// Parameters of `GET /api/stats/by-region/detailed`
///
/// Drill-down sends `regionId`/`regionType` (the scoped node and its level);
/// the dashboard widget asks for a fixed `level` over `days`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionalQuery {
    pub region_id: Option<String>,
    pub region_type: Option<RegionLevel>,
    pub level: Option<RegionLevel>,
    pub days: Option<u32>,
}

impl RegionalQuery {
    pub fn scoped(region_id: impl Into<String>, region_type: RegionLevel) -> Self {
        Self {
            region_id: Some(region_id.into()),
            region_type: Some(region_type),
            ..Default::default()
        }
    }

    pub fn at_level(level: RegionLevel, days: u32) -> Self {
        Self {
            level: Some(level),
            days: Some(days),
            ..Default::default()
        }
    }

    pub(crate) fn to_query(&self) -> Query {
        vec![
            ("regionId", self.region_id.clone()),
            ("regionType", self.region_type.map(|l| l.as_str().to_string())),
            ("level", self.level.map(|l| l.as_str().to_string())),
            ("days", self.days.map(|d| d.to_string())),
        ]
    }
}

/// Every dashboard widget; each one succeeds or fails on its own
#[derive(Debug)]
pub struct DashboardOverview {
    pub counters: ClientResult<DashboardStats>,
    pub trends: ClientResult<Trends>,
    pub regions: ClientResult<RegionalStats>,
    pub categories: ClientResult<CategoryBreakdown>,
    pub services: ClientResult<ServiceBreakdown>,
    pub msk_categories: ClientResult<MskCategoryBreakdown>,
    pub heatmap: ClientResult<Heatmap>,
}

fn days(d: u32) -> Query {
    vec![("days", Some(d.to_string()))]
}

impl ApiClient {
    /// `GET /api/stats/dashboard`
    pub async fn dashboard_stats(&self) -> ClientResult<DashboardStats> {
        self.get("/api/stats/dashboard", Vec::new()).await
    }

    /// `GET /api/stats/trends`; `None` asks for all modules
    pub async fn trends(&self, period: Period, module: Option<Module>) -> ClientResult<Trends> {
        let module = module.map(Module::as_str).unwrap_or("all");
        let query = vec![
            ("period", Some(period.as_str().to_string())),
            ("module", Some(module.to_string())),
        ];
        self.get("/api/stats/trends", query).await
    }

    /// `GET /api/stats/by-region`
    pub async fn stats_by_region(&self, days_back: u32) -> ClientResult<RegionalStats> {
        self.get("/api/stats/by-region", days(days_back)).await
    }

    /// `GET /api/stats/by-region/detailed`
    pub async fn regional_stats(&self, query: &RegionalQuery) -> ClientResult<RegionalStats> {
        self.get("/api/stats/by-region/detailed", query.to_query()).await
    }

    /// `GET /api/stats/heatmap`
    pub async fn heatmap(&self, module: Module, days_back: u32) -> ClientResult<Heatmap> {
        let mut query = days(days_back);
        query.push(("module", Some(module.as_str().to_string())));
        self.get("/api/stats/heatmap", query).await
    }

    /// `GET /api/stats/by-category`
    pub async fn stats_by_category(&self, days_back: u32) -> ClientResult<CategoryBreakdown> {
        self.get("/api/stats/by-category", days(days_back)).await
    }

    /// `GET /api/stats/by-service`
    pub async fn stats_by_service(&self, days_back: u32) -> ClientResult<ServiceBreakdown> {
        self.get("/api/stats/by-service", days(days_back)).await
    }

    /// `GET /api/stats/by-msk-category`
    pub async fn stats_by_msk_category(&self, days_back: u32) -> ClientResult<MskCategoryBreakdown> {
        self.get("/api/stats/by-msk-category", days(days_back)).await
    }

    /// Load all dashboard widgets concurrently
    pub async fn dashboard_overview(&self, period: Period) -> DashboardOverview {
        let d = period.days();
        let district_query = RegionalQuery::at_level(RegionLevel::District, d);
        let (counters, trends, regions, categories, services, msk_categories, heatmap) = join!(
            self.dashboard_stats(),
            self.trends(period, None),
            self.regional_stats(&district_query),
            self.stats_by_category(d),
            self.stats_by_service(d),
            self.stats_by_msk_category(d),
            self.heatmap(Module::Requests, d),
        );
        DashboardOverview {
            counters,
            trends,
            regions,
            categories,
            services,
            msk_categories,
            heatmap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_query_sends_region_and_type() {
        let q = RegionalQuery::scoped("d1", RegionLevel::District).to_query();
        assert_eq!(q[0], ("regionId", Some("d1".to_string())));
        assert_eq!(q[1], ("regionType", Some("district".to_string())));
        assert_eq!(q[2], ("level", None));
    }

    #[test]
    fn root_query_is_empty() {
        assert!(RegionalQuery::default().to_query().iter().all(|(_, v)| v.is_none()));
    }
}
