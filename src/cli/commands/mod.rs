pub mod appoint;
pub mod areas;
pub mod auth;
pub mod leaders;
pub mod report;
