use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reference::EntityRef;
use crate::workflow::{MskOrderStatus, RequestStatus, ServiceReportStatus};

/// Paginated list envelope used by the submission endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default = "one")]
    pub pages: u32,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
}

fn one() -> u32 {
    1
}

/// Region ancestry snapshot stored on a submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub region: Option<EntityRef>,
    #[serde(default)]
    pub district: Option<EntityRef>,
    #[serde(default)]
    pub neighborhood: Option<EntityRef>,
    #[serde(default)]
    pub street: Option<EntityRef>,
    #[serde(default)]
    pub neighborhood_custom: Option<String>,
    #[serde(default)]
    pub street_custom: Option<String>,
}

impl Address {
    /// Comma-joined names, falling back to free-text neighborhood/street
    pub fn label(&self) -> String {
        let name = |r: &Option<EntityRef>| r.as_ref().and_then(EntityRef::name).map(str::to_string);
        let parts = [
            name(&self.region),
            name(&self.district),
            name(&self.neighborhood).or_else(|| self.neighborhood_custom.clone()),
            name(&self.street).or_else(|| self.street_custom.clone()),
        ];
        parts
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Citizen account attached to a submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citizen {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Citizen request (murojaat)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "type")]
    pub request_type: Option<EntityRef>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub contact_first_name: Option<String>,
    #[serde(default)]
    pub contact_last_name: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub closing_note: Option<String>,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Service-availability report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceReport {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: ServiceReportStatus,
    #[serde(default)]
    pub service: Option<EntityRef>,
    #[serde(default)]
    pub user: Option<Citizen>,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub cancel_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Household-service order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MskOrder {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: MskOrderStatus,
    #[serde(default)]
    pub category: Option<EntityRef>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub contact_first_name: Option<String>,
    #[serde(default)]
    pub contact_last_name: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub cancel_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn address_label_prefers_directory_names() {
        let address: Address = serde_json::from_value(json!({
            "region": { "_id": "r1", "name": "Toshkent" },
            "district": { "_id": "d1", "name": "Chilonzor" },
            "neighborhood": null,
            "neighborhoodCustom": "Qatortol",
            "street": "s1"
        }))
        .unwrap();
        assert_eq!(address.label(), "Toshkent, Chilonzor, Qatortol");
    }

    #[test]
    fn parses_request_page() {
        let page: Page<Request> = serde_json::from_value(json!({
            "data": [{
                "_id": "q1",
                "status": "in_review",
                "category": "infrastructure",
                "contactFirstName": "Ali",
                "createdAt": "2026-01-05T10:00:00Z"
            }],
            "pages": 3,
            "total": 41
        }))
        .unwrap();
        assert_eq!(page.pages, 3);
        assert_eq!(page.data[0].status, RequestStatus::InReview);
        assert_eq!(page.data[0].address.label(), "");
    }

    #[test]
    fn missing_pagination_defaults_to_single_page() {
        let page: Page<MskOrder> = serde_json::from_value(json!({ "data": [] })).unwrap();
        assert_eq!(page.pages, 1);
        assert!(page.total.is_none());
    }
}
