//! Shared types, errors, and configuration for Gatehouse.
//!
//! This crate provides common types used across all other crates:
//! - Token claims and authentication payloads
//! - The JWT service for token issuance and validation
//! - Best-effort user lifecycle event publication
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod jwt;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use events::{EventPublisher, UserCreated};
pub use jwt::{JwtConfig, JwtError, JwtService};
