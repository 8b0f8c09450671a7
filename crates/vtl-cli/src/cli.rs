//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vtl_core::Range;

use crate::commands::util::{parse_range, parse_time};

/// Virtual timeline editor engine.
///
/// Annotates a recording with competency and trash segments and plays it back
/// with the trash cut out.
#[derive(Debug, Parser)]
#[command(name = "vtl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a JSONL script of player events and editor commands.
    Replay {
        /// Script file, one JSON step per line.
        script: PathBuf,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Map times between real and virtual time.
    Map {
        /// Media duration (e.g. 100, 1:40, 0:01:40).
        #[arg(long, value_parser = parse_time)]
        duration: f64,

        /// Trash range as START-END. Repeatable.
        #[arg(long, value_parser = parse_range)]
        trash: Vec<Range>,

        /// Treat inputs as virtual times and map them to real time.
        #[arg(long)]
        to_real: bool,

        /// Times to map.
        #[arg(required = true, value_parser = parse_time)]
        times: Vec<f64>,
    },

    /// List known competencies and their colors.
    Competencies {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}
