//! CLI interface for Contour

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Four-mode envelope generator simulator
#[derive(Parser)]
#[command(name = "contour")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a scenario to a WAV file (value, EOR, EOF channels)
    Render {
        /// Configuration file path
        #[arg(short, long, default_value = "contour.yaml")]
        config: PathBuf,

        /// Scenario file path
        #[arg(short, long, default_value = "scenario.yaml")]
        scenario: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print a scenario run as JSON lines, one per tick
    Trace {
        /// Configuration file path
        #[arg(short, long, default_value = "contour.yaml")]
        config: PathBuf,

        /// Scenario file path
        #[arg(short, long, default_value = "scenario.yaml")]
        scenario: PathBuf,

        /// Only print every Nth frame
        #[arg(short, long, default_value = "1")]
        every: usize,
    },

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "contour.yaml")]
        config: PathBuf,
    },

    /// Generate example configuration and scenario files
    Init,
}
