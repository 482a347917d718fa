//! Safar server library.
//!
//! The public site API and the admin console API for the Safar pilgrimage
//! booking site, as a library so it can be tested and driven by the CLI.
//!
//! # Security
//!
//! Every mutating catalog, inquiry, contact-info and allowlist route goes
//! through the [`AdminGate`](services::AdminGate). The gate fails closed: a
//! missing session, an unreadable session or a failed allowlist lookup is a
//! denial.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
