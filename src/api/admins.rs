use serde::{Deserialize, Serialize};
use serde_json::json;
use urlencoding::encode;

use super::{ApiClient, Listing};
use crate::error::ClientResult;
use crate::models::{Admin, AdminInput, AdminUpdate, AssignedRegion};
use crate::permission::Permissions;
use crate::workflow::{normalize_phone, require_non_empty, require_password};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PermissionsBody<'a> {
    permissions: &'a Permissions,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AdminResponse {
    Wrapped { admin: Admin },
    Bare(Admin),
}

impl From<AdminResponse> for Admin {
    fn from(r: AdminResponse) -> Self {
        match r {
            AdminResponse::Wrapped { admin } | AdminResponse::Bare(admin) => admin,
        }
    }
}

impl AdminInput {
    /// Normalised copy ready to send, or the first failing field
    pub fn validated(&self) -> ClientResult<AdminInput> {
        let phone = normalize_phone(&self.phone)?;
        require_password(&self.password)?;
        let alias = require_non_empty("alias", &self.alias)?;
        Ok(AdminInput {
            phone,
            password: self.password.clone(),
            alias,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        })
    }
}

impl ApiClient {
    /// `GET /api/admins`
    pub async fn list_admins(&self) -> ClientResult<Vec<Admin>> {
        let listing: Listing<Admin> = self.get("/api/admins", Vec::new()).await?;
        Ok(listing.into_items())
    }

    /// `GET /api/admins/:id`
    pub async fn get_admin(&self, id: &str) -> ClientResult<Admin> {
        let response: AdminResponse = self.get(&format!("/api/admins/{}", encode(id)), Vec::new()).await?;
        Ok(response.into())
    }

    /// `POST /api/admins`
    pub async fn create_admin(&self, input: &AdminInput) -> ClientResult<Admin> {
        let input = input.validated()?;
        let response: AdminResponse = self.post("/api/admins", &input).await?;
        Ok(response.into())
    }

    /// `PUT /api/admins/:id`
    pub async fn update_admin(&self, id: &str, update: &AdminUpdate) -> ClientResult<()> {
        let mut update = update.clone();
        if let Some(alias) = &update.alias {
            update.alias = Some(require_non_empty("alias", alias)?);
        }
        self.put_unit(&format!("/api/admins/{}", encode(id)), &update).await
    }

    /// `DELETE /api/admins/:id`
    pub async fn delete_admin(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("/api/admins/{}", encode(id))).await
    }

    /// `PUT /api/admins/:id/region`; `None` lifts the restriction
    pub async fn set_admin_region(&self, id: &str, assigned: Option<&AssignedRegion>) -> ClientResult<()> {
        let assigned_region = assigned.and_then(|a| {
            a.region_id()
                .map(|region| json!({ "region": region, "regionType": a.region_type }))
        });
        let body = json!({ "assignedRegion": assigned_region });
        self.put_unit(&format!("/api/admins/{}/region", encode(id)), &body).await
    }

    /// `PUT /api/admins/:id/permissions`
    pub async fn set_admin_permissions(&self, id: &str, permissions: &Permissions) -> ClientResult<()> {
        self.put_unit(
            &format!("/api/admins/{}/permissions", encode(id)),
            &PermissionsBody { permissions },
        )
        .await
    }
}
