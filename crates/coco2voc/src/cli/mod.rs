//! Subcommand implementations.

pub mod config;
pub mod convert;
pub mod info;
