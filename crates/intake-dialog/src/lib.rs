//! The per-call dialog engine.
//!
//! Drives a deterministic state machine over inbound telephony events (new
//! call, recognized speech/digits, timeout, call ended) and produces the
//! voice directive the transport renders back to the platform. Collects a
//! caller's first name, last name, and date of birth with per-field retry
//! and confirmation policies, then hands off to the records lookup.
//!
//! Every state transition is synchronous and completes before the directive
//! is returned; the engine holds no background work. Concurrency exists
//! only across calls, through the injected [`SessionStore`].

pub mod config;
pub mod engine;
pub mod error;
pub mod prompts;
pub mod store;

pub use config::{ConfigError, DialogConfig, GatherWindow};
pub use engine::DialogEngine;
pub use error::DialogError;
pub use store::{MemoryStore, SessionStore};
