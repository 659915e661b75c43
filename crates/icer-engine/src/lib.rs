pub mod config;
pub mod error;
pub mod evaluation;
pub mod policy;
pub mod telemetry;
