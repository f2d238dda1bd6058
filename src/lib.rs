pub mod api;
pub mod app_state;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod health;
pub mod relay;
pub mod resolver;
pub mod search;
pub mod telemetry;
