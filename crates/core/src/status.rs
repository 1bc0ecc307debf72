//! Well-known status name constants for users and cars.
//!
//! These must match the CHECK constraints in the schema migrations.

pub const USER_STATUS_ACTIVE: &str = "active";
pub const USER_STATUS_PENDING: &str = "pending";
pub const USER_STATUS_SUSPENDED: &str = "suspended";

pub const CAR_STATUS_IN_SERVICE: &str = "in-service";
pub const CAR_STATUS_READY: &str = "ready";
pub const CAR_STATUS_DELIVERED: &str = "delivered";

/// Whether `status` is a recognized user account status.
pub fn is_valid_user_status(status: &str) -> bool {
    matches!(
        status,
        USER_STATUS_ACTIVE | USER_STATUS_PENDING | USER_STATUS_SUSPENDED
    )
}

/// Whether `status` is a recognized car service status.
pub fn is_valid_car_status(status: &str) -> bool {
    matches!(
        status,
        CAR_STATUS_IN_SERVICE | CAR_STATUS_READY | CAR_STATUS_DELIVERED
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_user_statuses() {
        assert!(is_valid_user_status("active"));
        assert!(is_valid_user_status("pending"));
        assert!(is_valid_user_status("suspended"));
        assert!(!is_valid_user_status("banned"));
        assert!(!is_valid_user_status(""));
    }

    #[test]
    fn recognizes_car_statuses() {
        assert!(is_valid_car_status("in-service"));
        assert!(is_valid_car_status("ready"));
        assert!(is_valid_car_status("delivered"));
        assert!(!is_valid_car_status("scrapped"));
    }
}
