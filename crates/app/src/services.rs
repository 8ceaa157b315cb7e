//! Use-cases driven by the adapters.
//!
//! Services take their ports as generic parameters, so the HTTP layer and
//! tests can plug in any store or publisher.

pub mod parameter_form;
