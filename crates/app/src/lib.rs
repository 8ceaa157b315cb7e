//! # leafcfg-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ConfigStore` — namespaced key/value parameter storage
//!   - `EventPublisher` — fan-out of commit events
//! - Define the **driving/inbound** use-case:
//!   - `ParameterFormProcessor` — validate, commit, read
//! - Provide **in-process infrastructure** that doesn't need IO
//!   (event bus, in-memory config store, per-namespace commit locks)
//!
//! ## Dependency rule
//! Depends on `leafcfg-domain` only (plus `tokio::sync` for channels and locks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod commit_lock;
pub mod config_store;
pub mod event_bus;
pub mod ports;
pub mod services;
