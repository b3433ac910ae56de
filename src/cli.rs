use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::hardware::FirmwareMode;

/// partcfg - resolve partitioning choices for the installer
#[derive(Parser, Debug)]
#[command(name = "partcfg")]
#[command(about = "Resolve and check partition-module configuration")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a configuration and print the resulting global storage as JSON
    Resolve {
        /// Partition module configuration (YAML, or JSON by extension)
        config: PathBuf,

        /// Override firmware detection (efi or bios)
        #[arg(short, long)]
        firmware: Option<FirmwareMode>,

        /// Install choice to apply after loading (e.g. erase)
        #[arg(long)]
        install: Option<String>,

        /// Swap choice to apply after loading (e.g. small)
        #[arg(long)]
        swap: Option<String>,

        /// Also write the global storage to this file
        #[arg(long)]
        store_out: Option<PathBuf>,
    },
    /// Check a configuration and list every warning
    Validate {
        /// Partition module configuration (YAML, or JSON by extension)
        config: PathBuf,

        /// Exit with an error if there are any warnings
        #[arg(long)]
        strict: bool,
    },
    /// List the recognized install and swap choice names
    Names,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
