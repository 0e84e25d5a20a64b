//! Credential handling and authorization decisions.
//!
//! This module provides:
//! - Password hashing with Argon2id over an explicit per-user salt
//! - Constant-time password verification
//! - Role-membership checks on token claims

mod authorize;
mod password;

pub use authorize::{ADMIN_ROLE, has_role, require_role};
pub use password::{Credential, PasswordError, hash_password, verify_password};
