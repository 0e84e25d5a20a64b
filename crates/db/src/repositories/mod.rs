//! Repository abstractions for directory access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application.

pub mod role;
pub mod user;

pub use role::RoleRepository;
pub use user::UserRepository;
