//! tabmem: per-tab memory estimation and tab housekeeping for a browser
//! extension host.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod host;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
