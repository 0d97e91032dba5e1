use serde::{Deserialize, Serialize};

use crate::types::RegionLevel;

/// Counters of one module on the dashboard.
///
/// Status keys arrive as the backend's status values; the summary fields
/// (`today`, `yesterday`, `resolutionRate`) are camelCase. Statuses a module
/// does not have are simply absent and read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusCounts {
    pub total: u64,
    pub today: u64,
    pub yesterday: u64,
    #[serde(rename = "resolutionRate", skip_serializing_if = "Option::is_none")]
    pub resolution_rate: Option<f64>,
    pub pending: u64,
    pub in_review: u64,
    pub in_progress: u64,
    pub unavailable: u64,
    pub pending_confirmation: u64,
    pub confirmed: u64,
    pub resolved: u64,
    pub rejected: u64,
    pub cancelled: u64,
}

/// `GET /api/stats/dashboard`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub requests: StatusCounts,
    #[serde(default)]
    pub service_reports: StatusCounts,
    #[serde(default)]
    pub msk_orders: StatusCounts,
}

impl DashboardStats {
    /// Waiting for staff across all modules
    pub fn total_pending(&self) -> u64 {
        self.requests.pending + self.service_reports.unavailable + self.msk_orders.pending
    }

    pub fn total_rejected(&self) -> u64 {
        self.requests.rejected + self.service_reports.rejected + self.msk_orders.rejected
    }

    pub fn total_in_review(&self) -> u64 {
        self.requests.in_review + self.msk_orders.in_review
    }

    /// Share of resolved requests, one decimal, or an em dash with no requests
    pub fn resolved_percent(&self) -> String {
        let total = self.requests.total;
        if total == 0 {
            return "\u{2014}".to_string();
        }
        let pct = self.requests.resolved as f64 / total as f64 * 100.0;
        format!("{:.1}%", pct)
    }
}

/// Time window selector for trend queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "1y")]
    Year,
}

impl Period {
    pub fn days(self) -> u32 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
            Period::Quarter => 90,
            Period::Year => 365,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Week => "7d",
            Period::Month => "30d",
            Period::Quarter => "90d",
            Period::Year => "1y",
        }
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(Period::Week),
            "30d" => Ok(Period::Month),
            "90d" => Ok(Period::Quarter),
            "1y" => Ok(Period::Year),
            other => Err(format!("unknown period '{}' (expected 7d, 30d, 90d or 1y)", other)),
        }
    }
}

/// `GET /api/stats/trends`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub requests: Vec<u64>,
    #[serde(default)]
    pub service_reports: Vec<u64>,
    #[serde(default)]
    pub msk_orders: Vec<u64>,
}

impl Trends {
    /// One row per label; missing series values count as zero
    pub fn rows(&self) -> Vec<(String, u64, u64, u64)> {
        let at = |v: &[u64], i: usize| v.get(i).copied().unwrap_or(0);
        self.labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), at(&self.requests, i), at(&self.service_reports, i), at(&self.msk_orders, i)))
            .collect()
    }
}

/// One bar of the regional breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionStatsItem {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub requests: u64,
    #[serde(default)]
    pub service_reports: u64,
    #[serde(default)]
    pub msk_orders: u64,
    #[serde(default)]
    pub total: u64,
}

/// `GET /api/stats/by-region/detailed`
///
/// `level` is the level of the returned items; drill-down responses use
/// `items`, the dashboard's fixed-level query answers with `regions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionalStats {
    #[serde(default)]
    pub level: Option<RegionLevel>,
    #[serde(default)]
    pub items: Vec<RegionStatsItem>,
    #[serde(default)]
    pub regions: Vec<RegionStatsItem>,
}

impl RegionalStats {
    pub fn entries(&self) -> &[RegionStatsItem] {
        if self.items.is_empty() {
            &self.regions
        } else {
            &self.items
        }
    }
}

/// Generic "name + total" bar used by the category/service breakdowns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountItem {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub total: u64,
}

impl CountItem {
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.category.as_deref())
            .unwrap_or("\u{2014}")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    #[serde(default)]
    pub by_category: Vec<CountItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceBreakdown {
    #[serde(default)]
    pub services: Vec<CountItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MskCategoryBreakdown {
    #[serde(default)]
    pub categories: Vec<CountItem>,
}

/// Day (0 = Monday) by hour submission counts
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub day: u8,
    pub hour: u8,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Heatmap {
    #[serde(default)]
    pub data: Vec<HeatmapCell>,
}

impl Heatmap {
    /// 7 x 24 grid; out-of-range cells are ignored
    pub fn grid(&self) -> [[u64; 24]; 7] {
        let mut grid = [[0u64; 24]; 7];
        for cell in &self.data {
            if let Some(row) = grid.get_mut(cell.day as usize) {
                if let Some(slot) = row.get_mut(cell.hour as usize) {
                    *slot = cell.count;
                }
            }
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dashboard_totals_combine_modules() {
        let stats: DashboardStats = serde_json::from_value(json!({
            "requests": { "total": 8, "pending": 2, "in_review": 1, "resolved": 3, "rejected": 1 },
            "serviceReports": { "total": 5, "unavailable": 4, "rejected": 1 },
            "mskOrders": { "total": 2, "pending": 1, "in_review": 1 }
        }))
        .unwrap();

        assert_eq!(stats.total_pending(), 7);
        assert_eq!(stats.total_rejected(), 2);
        assert_eq!(stats.total_in_review(), 2);
        assert_eq!(stats.resolved_percent(), "37.5%");
    }

    #[test]
    fn counters_carry_a_fractional_resolution_rate() {
        let stats: DashboardStats = serde_json::from_value(json!({
            "requests": { "total": 3, "pending": 1, "resolved": 1, "today": 1, "yesterday": 2, "resolutionRate": 33.3 },
            "serviceReports": { "total": 1, "unavailable": 1, "resolutionRate": 0 },
            "mskOrders": { "total": 0 }
        }))
        .unwrap();

        assert_eq!(stats.requests.resolution_rate, Some(33.3));
        assert_eq!(stats.requests.today, 1);
        assert_eq!(stats.requests.yesterday, 2);
        assert_eq!(stats.service_reports.resolution_rate, Some(0.0));
        assert_eq!(stats.msk_orders.resolution_rate, None);
        assert_eq!(stats.total_pending(), 2);
        assert_eq!(stats.resolved_percent(), "33.3%");
    }

    #[test]
    fn resolved_percent_without_requests_is_a_dash() {
        assert_eq!(DashboardStats::default().resolved_percent(), "\u{2014}");
    }

    #[test]
    fn regional_stats_accept_both_list_keys() {
        let drill: RegionalStats = serde_json::from_value(json!({
            "level": "district",
            "items": [{ "_id": "d1", "name": "Chilonzor", "requests": 3, "total": 3 }]
        }))
        .unwrap();
        assert_eq!(drill.level, Some(RegionLevel::District));
        assert_eq!(drill.entries().len(), 1);

        let fixed: RegionalStats = serde_json::from_value(json!({
            "regions": [{ "name": "Yunusobod", "total": 1 }]
        }))
        .unwrap();
        assert_eq!(fixed.entries()[0].name, "Yunusobod");
    }

    #[test]
    fn heatmap_grid_ignores_out_of_range_cells() {
        let heatmap: Heatmap = serde_json::from_value(json!({
            "data": [{ "day": 0, "hour": 9, "count": 4 }, { "day": 9, "hour": 1, "count": 2 }]
        }))
        .unwrap();
        let grid = heatmap.grid();
        assert_eq!(grid[0][9], 4);
        assert_eq!(grid.iter().flatten().sum::<u64>(), 4);
    }

    #[test]
    fn period_maps_to_days() {
        assert_eq!("90d".parse::<Period>().unwrap().days(), 90);
        assert_eq!(Period::Year.days(), 365);
        assert!("2w".parse::<Period>().is_err());
    }
}
