//! Outbound ports.
//!
//! The processor talks to storage and to event subscribers only through
//! these traits. Adapters (and the in-process implementations in this
//! crate) provide them.

pub mod config_store;
pub mod event_bus;

pub use config_store::ConfigStore;
pub use event_bus::EventPublisher;
