use serde::{Deserialize, Serialize};
use tracing::info;

use super::ApiClient;
use crate::error::ClientResult;
use crate::models::Admin;
use crate::session::Session;
use crate::workflow::{normalize_phone, require_password};

/// Fallback notification text for a failed login
pub const LOGIN_FAILED: &str = "Login failed";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    phone: String,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user: Admin,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MeResponse {
    Wrapped { user: Admin },
    Bare(Admin),
}

impl ApiClient {
    /// `POST /api/auth/admin/login`
    ///
    /// The phone is validated and normalised before the call; the returned
    /// session is not persisted here.
    pub async fn login(&self, phone: &str, password: &str) -> ClientResult<Session> {
        let phone = normalize_phone(phone)?;
        require_password(password)?;

        // A 401 here is bad credentials, not an expired session
        let anonymous = ApiClient {
            token: None,
            store: None,
            ..self.clone()
        };
        let response: LoginResponse = anonymous
            .post("/api/auth/admin/login", &LoginRequest { phone, password })
            .await?;

        info!(admin = %response.user.id, role = ?response.user.role, "logged in");
        Ok(Session::new(response.token, response.user))
    }

    /// `GET /api/auth/me`
    pub async fn me(&self) -> ClientResult<Admin> {
        let response: MeResponse = self.get("/api/auth/me", Vec::new()).await?;
        Ok(match response {
            MeResponse::Wrapped { user } | MeResponse::Bare(user) => user,
        })
    }

    /// Same token with a freshly fetched profile
    pub async fn refresh_session(&self, session: &Session) -> ClientResult<Session> {
        let user = self.me().await?;
        Ok(Session::new(session.token.clone(), user))
    }
}
