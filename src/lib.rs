pub mod api;
pub mod cli;
pub mod config;
pub mod drilldown;
pub mod error;
pub mod models;
pub mod permission;
pub mod region;
pub mod session;
pub mod types;
pub mod workflow;

pub use api::ApiClient;
pub use error::{ClientError, ClientResult};
pub use session::{Session, SessionStore};
