//! Async client for the e-Murojaat backend REST surface.
//!
//! Every call is JSON over HTTP with an optional bearer token. A 401 on an
//! authenticated call clears the attached session store and surfaces as
//! `ClientError::SessionExpired`; any other non-2xx keeps the backend's
//! `message` field for the user-facing notification.

pub mod admins;
pub mod auth;
pub mod catalog;
pub mod regions;
pub mod stats;
pub mod submissions;

use std::time::Duration;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::config::{config, ApiConfig};
use crate::error::{ClientError, ClientResult};
use crate::session::{Session, SessionStore};

/// Query string pairs; `None` values are left out
pub type Query = Vec<(&'static str, Option<String>)>;

/// List endpoints answer with a bare array or a `{data: [...]}` envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> Listing<T> {
    pub(crate) fn into_items(self) -> Vec<T> {
        match self {
            Listing::Bare(items) | Listing::Wrapped { data: items } => items,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    store: Option<SessionStore>,
    log_requests: bool,
}

impl ApiClient {
    /// Client for `base_url` using the timeout and user agent of the global config
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let mut api = config().api.clone();
        api.base_url = base_url.to_string();
        Self::from_config(&api)
    }

    pub fn from_config(api: &ApiConfig) -> ClientResult<Self> {
        let base_url = api.base_url.trim().trim_end_matches('/').to_string();
        // Fail early on a malformed base instead of on the first call
        Url::parse(&base_url)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .user_agent(api.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: None,
            store: None,
            log_requests: api.enable_request_logging,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_session(self, session: &Session) -> Self {
        self.with_token(session.token.clone())
    }

    /// Store cleared when the backend reports the session expired
    pub fn with_session_store(mut self, store: SessionStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    fn request(&self, method: Method, path: &str, query: &Query) -> ClientResult<RequestBuilder> {
        let mut url = self.url(path)?;
        {
            let present: Vec<_> = query
                .iter()
                .filter_map(|(k, v)| v.as_deref().map(|v| (*k, v)))
                .collect();
            if !present.is_empty() {
                url.query_pairs_mut().extend_pairs(present);
            }
        }

        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ClientError::validation("Stored token is not a valid header value"))?;
            builder = builder.header(AUTHORIZATION, value);
        }
        Ok(builder)
    }

    /// Send and return the raw body of a 2xx response
    async fn execute(&self, method: Method, path: &str, builder: RequestBuilder) -> ClientResult<String> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if self.log_requests {
            debug!(%method, path, status = status.as_u16(), "api call");
        }

        if status.is_success() {
            return Ok(body);
        }

        if status.as_u16() == 401 && self.token.is_some() {
            warn!(path, "session expired");
            if let Some(store) = &self.store {
                store.clear()?;
            }
            return Err(ClientError::SessionExpired);
        }

        Err(ClientError::rejected(status.as_u16(), &body))
    }

    fn decode<T: DeserializeOwned>(body: &str) -> ClientResult<T> {
        // An empty 2xx body reads as JSON null
        let body = if body.trim().is_empty() { "null" } else { body };
        Ok(serde_json::from_str(body)?)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, query: Query) -> ClientResult<T> {
        let builder = self.request(Method::GET, path, &query)?;
        let body = self.execute(Method::GET, path, builder).await?;
        Self::decode(&body)
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path, &Vec::new())?.json(body);
        let body = self.execute(Method::POST, path, builder).await?;
        Self::decode(&body)
    }

    /// PUT whose response body is not needed
    pub(crate) async fn put_unit<B>(&self, path: &str, body: &B) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PUT, path, &Vec::new())?.json(body);
        self.execute(Method::PUT, path, builder).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> ClientResult<()> {
        let builder = self.request(Method::DELETE, path, &Vec::new())?;
        self.execute(Method::DELETE, path, builder).await?;
        Ok(())
    }
}
