//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Radial argument maps: parse discussion tables, lay them out as a sundial, drill in and out
#[derive(Parser, Debug)]
#[command(name = "sundial")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global one
    #[arg(short, long, global = true, env = "SUNDIAL_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Fail on duplicate ids and unknown parents
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the argument hierarchy as a tree
    Tree {
        /// Argument table (CSV)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Start at this argument instead of the root
        #[arg(long)]
        focus: Option<String>,
    },

    /// Print arc geometry for a focused subtree
    Layout {
        /// Argument table (CSV)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Drill into these arguments in order
        #[arg(short, long, value_delimiter = ',')]
        focus: Vec<String>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Render the chart as an SVG document
    Svg {
        /// Argument table (CSV)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Drill into these arguments in order
        #[arg(short, long, value_delimiter = ',')]
        focus: Vec<String>,
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Navigate the map interactively (focus, back, root, ls)
    Explore {
        /// Argument table (CSV)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Convert a numbered discussion outline into an argument table
    Convert {
        /// Outline text file
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Output CSV (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Show config file locations
    Path,
    /// Write a template to the global config location
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
