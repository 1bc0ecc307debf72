//! Shared domain types for the AutoLog backend.
//!
//! Holds the primitives every other crate depends on: id/timestamp aliases,
//! the domain error enum, and the well-known role/status name constants.

pub mod error;
pub mod roles;
pub mod status;
pub mod types;
