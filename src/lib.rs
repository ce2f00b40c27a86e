pub mod config;
pub mod error;
pub mod market_data;
pub mod projection;
pub mod state;
pub mod telemetry;
pub mod view;
