//! CLI library components for roster imports.

pub mod config;
pub mod logging;
pub mod workspace;
