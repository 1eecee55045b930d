//! slimroot library exports.
//!
//! The binary is a thin clap front end over these modules; integration
//! tests drive them directly with a fake oracle.

pub mod archive;
pub mod closure;
pub mod commands;
pub mod config;
pub mod manifest;
pub mod oracle;
pub mod preflight;
pub mod process;
pub mod timing;

pub use closure::{ClosureWalker, OutputFilter, Seed};
pub use manifest::Manifest;
pub use oracle::{HostOracle, SystemOracle};
