//! # leafcfg-domain
//!
//! Pure domain model for the Nissan Leaf web configuration forms.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps, lenient parsers
//! - Define **Fields** (typed, bounded form inputs with defaults)
//! - Define **Schemas** (ordered field sets bound to a store namespace)
//! - Run **batch validation**: every field checked, every error collected
//! - Describe the concrete Leaf schemas (`features`, `battery`)
//! - Define **Events** emitted after a successful commit
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod parse;
pub mod time;

pub mod batch;
pub mod event;
pub mod field;
pub mod leaf;
pub mod schema;
