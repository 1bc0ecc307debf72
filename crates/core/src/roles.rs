//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `users.role` in
//! `20260815000001_create_users_table.sql`.

pub const ROLE_MECHANIC: &str = "mechanic";
pub const ROLE_CUSTOMER: &str = "customer";

/// Whether `role` is one of the recognized role names.
pub fn is_valid_role(role: &str) -> bool {
    role == ROLE_MECHANIC || role == ROLE_CUSTOMER
}
