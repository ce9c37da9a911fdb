//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Drill-down multi-select browser for coded hierarchical taxonomies
#[derive(Parser, Debug)]
#[command(name = "taxotree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Table or snapshot to browse when no subcommand is given.
    ///
    /// Subcommand names win over file names: open a file called `tree`
    /// as `./tree` or with `browse tree`.
    #[arg(value_hint = ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse a taxonomy interactively (default)
    Browse {
        /// Coded table or `.json` snapshot; built-in sample if omitted
        #[arg(value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
    },

    /// Build a snapshot from a coded table
    Build {
        /// Coded table
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Output file (default: configured snapshot)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Print a taxonomy as tree
    Tree {
        /// Coded table or `.json` snapshot; built-in sample if omitted
        #[arg(value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
        /// Mark these node ids as toggled, showing the resulting selection
        #[arg(short, long = "select", value_name = "ID")]
        select: Vec<String>,
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
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config instead of ./.taxotree.toml
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
