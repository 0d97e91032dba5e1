use serde::Deserialize;
use serde_json::json;
use urlencoding::encode;

use super::{ApiClient, Listing};
use crate::error::{ClientError, ClientResult};
use crate::models::{Region, RegionInput};
use crate::types::RegionLevel;
use crate::workflow::require_non_empty;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RegionResponse {
    Wrapped { data: Region },
    Bare(Region),
}

impl ApiClient {
    /// `GET /api/regions?type&parent`
    pub async fn list_regions(&self, level: Option<RegionLevel>, parent: Option<&str>) -> ClientResult<Vec<Region>> {
        let query = vec![
            ("type", level.map(|l| l.as_str().to_string())),
            ("parent", parent.filter(|p| !p.is_empty()).map(str::to_string)),
        ];
        let listing: Listing<Region> = self.get("/api/regions", query).await?;
        Ok(listing.into_items())
    }

    /// Options of one cascading-picker level: top-level regions, or the
    /// children of `parent`
    pub async fn region_options(&self, level: RegionLevel, parent: Option<&str>) -> ClientResult<Vec<Region>> {
        match (level.parent(), parent) {
            (None, _) => self.list_regions(Some(level), None).await,
            (Some(_), Some(parent)) if !parent.is_empty() => self.list_regions(Some(level), Some(parent)).await,
            // Nothing selected above: the level has no options yet
            (Some(_), _) => Ok(Vec::new()),
        }
    }

    /// `GET /api/regions/:id`
    pub async fn get_region(&self, id: &str) -> ClientResult<Region> {
        let response: RegionResponse = self.get(&format!("/api/regions/{}", encode(id)), Vec::new()).await?;
        Ok(match response {
            RegionResponse::Wrapped { data } | RegionResponse::Bare(data) => data,
        })
    }

    /// `POST /api/regions`
    ///
    /// Checks the name and that the parent sits exactly one level above the
    /// new region before creating it.
    pub async fn create_region(&self, input: &RegionInput) -> ClientResult<Region> {
        let name = require_non_empty("name", &input.name)?;
        let parent = input.parent.as_deref().map(str::trim).filter(|p| !p.is_empty());

        match (input.level.parent(), parent) {
            (None, None) => {}
            (None, Some(_)) => {
                return Err(ClientError::field("parent", "A top-level region has no parent"));
            }
            (Some(expected), None) => {
                return Err(ClientError::field(
                    "parent",
                    format!("A {} needs a parent {}", input.level, expected),
                ));
            }
            (Some(expected), Some(parent_id)) => {
                let parent = self.get_region(parent_id).await?;
                if parent.level != expected {
                    return Err(ClientError::field(
                        "parent",
                        format!("Parent of a {} must be a {}, not a {}", input.level, expected, parent.level),
                    ));
                }
            }
        }

        let body = RegionInput::new(name, input.level, parent.map(str::to_string));
        let response: RegionResponse = self.post("/api/regions", &body).await?;
        Ok(match response {
            RegionResponse::Wrapped { data } | RegionResponse::Bare(data) => data,
        })
    }

    /// `PUT /api/regions/:id` (rename)
    pub async fn rename_region(&self, id: &str, name: &str) -> ClientResult<()> {
        let name = require_non_empty("name", name)?;
        self.put_unit(&format!("/api/regions/{}", encode(id)), &json!({ "name": name }))
            .await
    }

    /// `DELETE /api/regions/:id`; children are not checked client-side
    pub async fn delete_region(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("/api/regions/{}", encode(id))).await
    }
}
