pub mod agent;
pub mod cache;
pub mod config;
pub mod schedule;
pub mod sent;
