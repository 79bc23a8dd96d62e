//! Advisor Module
//!
//! Resolves AI-generated college insights through the response cache,
//! calling the upstream text-generation API only on a miss.

pub mod extract;
pub mod prompt;
pub mod service;
pub mod single_flight;
pub mod upstream;

pub use service::{Advisor, Resolved, DEFAULT_UPSTREAM_TIMEOUT};
pub use single_flight::{Role, SingleFlight};
pub use upstream::{OpenAiClient, TextGenerator};
