//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod car_repo;
pub mod session_repo;
pub mod user_repo;

pub use car_repo::CarRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
