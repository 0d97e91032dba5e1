// Client error types
use serde::Deserialize;
use thiserror::Error;

/// Notification text used when the backend does not supply a message
pub const GENERIC_FAILURE: &str = "Something went wrong";

/// Errors surfaced by the admin client
#[derive(Debug, Error)]
pub enum ClientError {
    // Rejected before any network call
    #[error("{message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    // 401: the stored session is no longer valid
    #[error("Session expired, please log in again")]
    SessionExpired,

    // No stored session for a command that needs one
    #[error("Not logged in")]
    NotAuthenticated,

    // Any other non-2xx response
    #[error("{}", message.as_deref().unwrap_or(GENERIC_FAILURE))]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Operation cancelled")]
    Cancelled,
}

/// Error body returned by the backend on non-2xx responses
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation {
            field: None,
            message: message.into(),
        }
    }

    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ClientError::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Build from a non-2xx response body, keeping the backend message verbatim
    pub fn from_response(status: u16, body: &str) -> Self {
        if status == 401 {
            return ClientError::SessionExpired;
        }
        Self::rejected(status, body)
    }

    /// Same as `from_response` without the 401 session-expiry mapping
    /// (a failed login is a rejection, not an expiry)
    pub fn rejected(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());
        ClientError::Api { status, message }
    }

    /// HTTP-like status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ClientError::Validation { .. } => 400,
            ClientError::SessionExpired | ClientError::NotAuthenticated => 401,
            ClientError::Api { status, .. } => *status,
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()).unwrap_or(503),
            ClientError::Decode(_) => 502,
            ClientError::Url(_) | ClientError::Storage(_) => 500,
            ClientError::Cancelled => 499,
        }
    }

    /// Error code for JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Validation { .. } => "VALIDATION_ERROR",
            ClientError::SessionExpired => "SESSION_EXPIRED",
            ClientError::NotAuthenticated => "NOT_AUTHENTICATED",
            ClientError::Api { status, .. } => match status {
                400 => "BAD_REQUEST",
                403 => "FORBIDDEN",
                404 => "NOT_FOUND",
                409 => "CONFLICT",
                422 => "UNPROCESSABLE_ENTITY",
                429 => "TOO_MANY_REQUESTS",
                s if *s >= 500 => "SERVER_ERROR",
                _ => "API_ERROR",
            },
            ClientError::Transport(_) => "TRANSPORT_ERROR",
            ClientError::Decode(_) => "INVALID_RESPONSE",
            ClientError::Url(_) => "INVALID_URL",
            ClientError::Storage(_) => "STORAGE_ERROR",
            ClientError::Cancelled => "CANCELLED",
        }
    }

    /// Text for a transient user-facing notification
    pub fn user_message(&self) -> String {
        self.user_message_or(GENERIC_FAILURE)
    }

    /// Same as `user_message` with a caller-chosen fallback
    pub fn user_message_or(&self, fallback: &str) -> String {
        match self {
            ClientError::Validation { message, .. } => message.clone(),
            ClientError::Api { message: Some(m), .. } => m.clone(),
            ClientError::SessionExpired | ClientError::NotAuthenticated => self.to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::SessionExpired)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_is_kept_verbatim() {
        let err = ClientError::from_response(409, r#"{"message":"Bu telefon band"}"#);
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "CONFLICT");
        assert_eq!(err.user_message(), "Bu telefon band");
    }

    #[test]
    fn missing_message_falls_back_to_generic_text() {
        let err = ClientError::from_response(500, "<html>oops</html>");
        assert_eq!(err.user_message(), GENERIC_FAILURE);
        assert_eq!(err.user_message_or("Login failed"), "Login failed");
        assert_eq!(err.to_string(), GENERIC_FAILURE);
    }

    #[test]
    fn unauthorized_maps_to_session_expiry() {
        let err = ClientError::from_response(401, r#"{"message":"jwt expired"}"#);
        assert!(err.is_session_expired());
        assert_eq!(err.error_code(), "SESSION_EXPIRED");
    }
}
