//! Safar Core - Shared domain types.
//!
//! This crate provides the types shared by every Safar component:
//! - `server` - Public site API and admin console API
//! - `cli` - Operator tooling for migrations, allowlist and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. This keeps it lightweight and usable anywhere.
//!
//! # Modules
//!
//! - [`types`] - Normalized emails, document ids, prices and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
