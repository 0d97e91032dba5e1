//! Client-side rules applied before anything is sent to the backend:
//! submission status transitions and form validation.

pub mod status;
pub mod validation;

pub use status::{
    MskOrderStatus, RequestStatus, ServiceReportStatus, StatusUpdate, SubmissionStatus,
};
pub use validation::{normalize_phone, require_non_empty, require_password};
