//! Library components for the lab KPI CLI.

pub mod config;
pub mod export;
pub mod logging;
