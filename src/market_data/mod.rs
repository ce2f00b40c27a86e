pub mod adapters;
pub mod refresh_worker;
pub mod traits;
pub mod types;
