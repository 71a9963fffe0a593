use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "jobshot", version, about = "Turn job listing screenshots into structured records")]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process saved screenshots, one subdirectory per results page
    Scan {
        dir: PathBuf,
        /// CSV output path
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Process screenshots as they are written to a directory, until Ctrl-C
    Watch {
        dir: PathBuf,
        /// Page number recorded on every listing
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Assemble a record from recorded OCR text (stdin when no file is given)
    Parse { file: Option<PathBuf> },
}
