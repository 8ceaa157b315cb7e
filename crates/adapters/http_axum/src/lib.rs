//! # leafcfg-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Accept **form submissions** (`application/x-www-form-urlencoded`) for
//!   every registered schema at `POST /xnl/{schema}`
//! - Serve the current parameter values as JSON at `GET /xnl/{schema}`
//! - Map [`FormError`](leafcfg_domain::error::FormError) into status codes:
//!   rejected submissions become `400` with every field error listed
//!
//! Markup is left to the host; this adapter only speaks JSON.
//!
//! ## Dependency rule
//! Depends on `leafcfg-app` (for port traits and the processor) and
//! `leafcfg-domain` (for types used in request/response mapping). Never leaks
//! axum types into the domain.

pub mod error;
#[allow(clippy::missing_errors_doc)]
pub mod forms;
pub mod router;
pub mod state;
