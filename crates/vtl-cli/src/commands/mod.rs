//! CLI subcommand implementations.

pub mod competencies;
pub mod map;
pub mod replay;
pub mod util;
