//! CLI command implementations

pub mod completions;
pub mod config;
pub mod diagnostics;
pub mod find;
pub mod io;
pub mod show;
pub mod stats;
pub mod traverse;
