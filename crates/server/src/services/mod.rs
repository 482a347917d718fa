//! Business logic services.
//!
//! # Services
//!
//! - `authz` - Admin authorization gate (superuser email, role flag, allowlist)

pub mod authz;

pub use authz::{AdminGate, AllowlistLookup, Authorization, DenyReason, GrantSource};
