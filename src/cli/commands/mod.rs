pub mod admins;
pub mod auth;
pub mod catalog;
pub mod regions;
pub mod stats;
pub mod submissions;
