pub mod health;
pub mod metrics;
pub mod summary;
pub mod trades;
pub mod ws;
