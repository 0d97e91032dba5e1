#![allow(dead_code)]

use anyhow::Result;
use httpmock::MockServer;
use serde_json::{json, Value};

use murojaat_admin::config::ApiConfig;
use murojaat_admin::ApiClient;

pub const TOKEN: &str = "test-token";
pub const BEARER: &str = "Bearer test-token";

pub async fn start() -> MockServer {
    MockServer::start_async().await
}

fn api_config(base_url: String) -> ApiConfig {
    ApiConfig {
        base_url,
        timeout_secs: 5,
        user_agent: "murojaat-admin-tests".to_string(),
        enable_request_logging: true,
    }
}

/// Client without a token
pub fn anonymous(server: &MockServer) -> Result<ApiClient> {
    Ok(ApiClient::from_config(&api_config(server.base_url()))?)
}

/// Client carrying `TOKEN`
pub fn client(server: &MockServer) -> Result<ApiClient> {
    Ok(anonymous(server)?.with_token(TOKEN))
}

/// Client pointed at a port nothing listens on; any request fails
pub fn unreachable() -> Result<ApiClient> {
    Ok(ApiClient::from_config(&api_config("http://127.0.0.1:9".to_string()))?.with_token(TOKEN))
}

pub fn admin_json(id: &str, role: &str) -> Value {
    json!({
        "_id": id,
        "phone": "+998901234567",
        "alias": "operator",
        "firstName": "Ali",
        "isActive": true,
        "role": role,
        "assignedRegion": null,
        "permissions": {
            "requests": { "access": "manage", "allowedTypes": [] },
            "services": { "access": "read", "allowedTypes": [{ "_id": "svc1", "name": "Suv" }] }
        }
    })
}

pub fn region_json(id: &str, level: &str, parent: Option<&str>) -> Value {
    json!({
        "_id": id,
        "name": id.to_uppercase(),
        "type": level,
        "parent": parent,
    })
}
