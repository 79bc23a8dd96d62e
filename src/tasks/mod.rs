//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Sweep: removes expired cache entries independent of reads

mod cleanup;

pub use cleanup::spawn_cleanup_task;
