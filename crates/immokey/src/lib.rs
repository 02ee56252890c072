pub mod auth;
pub mod config;
pub mod error;
pub mod hospitality;
pub mod telemetry;
