use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sff")]
#[command(about = "Saccani Form Filler - batch and manual account form filling", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print the session log after the command
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use the built-in mock backend even if an API URL is configured
    #[arg(long, global = true, conflicts_with = "api_url")]
    pub mock: bool,

    /// Backend base URL (overrides config and SFF_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload an input file and template, then generate one PDF per record
    Process {
        /// Input data file (.csv, .xlsx, .xls, .docx, .txt)
        #[arg(short, long)]
        input: PathBuf,

        /// PDF template
        #[arg(short, long)]
        template: PathBuf,

        /// Output folder (defaults to the configured output folder)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Enter accounts interactively
    Manual,

    /// Look up a business license by name and city
    Scrape {
        /// Business name
        #[arg(short, long)]
        name: String,

        /// City
        #[arg(short, long)]
        city: String,
    },

    /// Show or edit the configuration
    Config {
        /// Store a backend base URL
        #[arg(long)]
        set_api_url: Option<String>,

        /// Remove the stored backend URL (use the mock)
        #[arg(long)]
        clear_api_url: bool,

        /// Show the configuration
        #[arg(long)]
        show: bool,
    },
}
