pub mod admin;
pub mod catalog;
pub mod reference;
pub mod region;
pub mod stats;
pub mod submission;

pub use admin::{Admin, AdminInput, AdminUpdate, AssignedRegion};
pub use catalog::{item_ids, Catalog, CatalogInput, CatalogItem};
pub use reference::EntityRef;
pub use region::{Region, RegionInput};
pub use submission::{Address, Citizen, MskOrder, Page, Request, ServiceReport};
pub use stats::{
    CategoryBreakdown, CountItem, DashboardStats, Heatmap, HeatmapCell, MskCategoryBreakdown, Period, RegionStatsItem,
    RegionalStats, ServiceBreakdown, StatusCounts, Trends,
};
