pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "feeder")]
#[command(about = "A single-screen article reader with favorites", long_about = None)]
pub struct Cli {
    /// Article document to read instead of the configured one
    #[arg(short, long, global = true)]
    pub articles: Option<PathBuf>,

    /// Configuration file to use instead of ~/.config/feeder/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List articles
    List {
        /// Show favorites only
        #[arg(long)]
        favorites: bool,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate the article document
    Check,
    /// Launch the interactive reader
    Read,
}
