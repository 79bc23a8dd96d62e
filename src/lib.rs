//! fitcache - TTL response cache and LLM insight service
//!
//! Shields a paid text-generation API from duplicate requests: insights are
//! cached per `namespace:user:college` key for a fixed TTL, with a capacity
//! bound, a background sweep and coalescing of concurrent misses.

pub mod advisor;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
