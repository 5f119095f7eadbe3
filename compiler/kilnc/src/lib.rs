//! Kiln optimizer CLI library.
//!
//! The `kiln` binary is a thin argument dispatcher over [`commands`]; the
//! command implementations live here so integration tests and other tools
//! can call them directly.

pub mod commands;
pub mod tracing_setup;
