// tabmem shared type definitions
// Each submodule defines types used across the crate.

pub mod errors;
pub mod event;
pub mod memory;
pub mod settings;
pub mod stats;
pub mod tab;
