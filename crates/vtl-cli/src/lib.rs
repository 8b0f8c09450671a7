//! Virtual timeline editor CLI library.
//!
//! This crate provides the `vtl` command-line driver for `vtl-core`.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
