//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireMechanic`] -- Requires the `mechanic` role.
//! - [`rbac::RequireCarAccess`] -- Mechanic, or customer restricted to their own car.

pub mod auth;
pub mod rbac;
