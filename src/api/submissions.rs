use serde::de::DeserializeOwned;
use urlencoding::encode;

use super::{ApiClient, Query};
use crate::error::ClientResult;
use crate::models::{MskOrder, Page, Request, ServiceReport};
use crate::workflow::{MskOrderStatus, RequestStatus, ServiceReportStatus, StatusUpdate, SubmissionStatus};

/// `GET /api/requests` filters
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub category: Option<String>,
    pub request_type: Option<String>,
    pub page: Option<u32>,
}

/// `GET /api/service-reports` filters
#[derive(Debug, Clone, Default)]
pub struct ServiceReportFilter {
    pub service_id: Option<String>,
    pub status: Option<ServiceReportStatus>,
    pub page: Option<u32>,
}

/// `GET /api/msk/orders` filters
#[derive(Debug, Clone, Default)]
pub struct MskOrderFilter {
    pub status: Option<MskOrderStatus>,
    pub page: Option<u32>,
}

fn non_blank(v: &Option<String>) -> Option<String> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

// Pages are 1-based; page 0 is sent as page 1
fn page(p: Option<u32>) -> Option<String> {
    p.map(|p| p.max(1).to_string())
}

impl RequestFilter {
    fn query(&self) -> Query {
        vec![
            ("status", self.status.map(|s| s.as_str().to_string())),
            ("category", non_blank(&self.category)),
            ("type", non_blank(&self.request_type)),
            ("page", page(self.page)),
        ]
    }
}

impl ServiceReportFilter {
    fn query(&self) -> Query {
        vec![
            ("serviceId", non_blank(&self.service_id)),
            ("status", self.status.map(|s| s.as_str().to_string())),
            ("page", page(self.page)),
        ]
    }
}

impl MskOrderFilter {
    fn query(&self) -> Query {
        vec![
            ("status", self.status.map(|s| s.as_str().to_string())),
            ("page", page(self.page)),
        ]
    }
}

impl ApiClient {
    async fn list_page<T: DeserializeOwned>(&self, path: &str, query: Query) -> ClientResult<Page<T>> {
        self.get(path, query).await
    }

    async fn put_status<S: SubmissionStatus>(&self, base: &str, id: &str, update: &StatusUpdate<S>) -> ClientResult<()> {
        self.put_unit(&format!("{}/{}/status", base, encode(id)), update).await
    }

    pub async fn list_requests(&self, filter: &RequestFilter) -> ClientResult<Page<Request>> {
        self.list_page("/api/requests", filter.query()).await
    }

    /// `PUT /api/requests/:id/status` with an already validated transition
    pub async fn update_request_status(&self, id: &str, update: &StatusUpdate<RequestStatus>) -> ClientResult<()> {
        self.put_status("/api/requests", id, update).await
    }

    pub async fn list_service_reports(&self, filter: &ServiceReportFilter) -> ClientResult<Page<ServiceReport>> {
        self.list_page("/api/service-reports", filter.query()).await
    }

    pub async fn update_service_report_status(
        &self,
        id: &str,
        update: &StatusUpdate<ServiceReportStatus>,
    ) -> ClientResult<()> {
        self.put_status("/api/service-reports", id, update).await
    }

    pub async fn list_msk_orders(&self, filter: &MskOrderFilter) -> ClientResult<Page<MskOrder>> {
        self.list_page("/api/msk/orders", filter.query()).await
    }

    pub async fn update_msk_order_status(&self, id: &str, update: &StatusUpdate<MskOrderStatus>) -> ClientResult<()> {
        self.put_status("/api/msk/orders", id, update).await
    }
}
