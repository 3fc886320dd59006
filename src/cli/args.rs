//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Instrument lineage tree layout with a linked historical sales chart
#[derive(Parser, Debug)]
#[command(name = "pianoviz")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the positioned lineage tree
    Tree {
        /// Lineage JSON (default: configured history file)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// List level, position and allotment of every node
    Layout {
        /// Lineage JSON (default: configured history file)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Emit JSON for external renderers
        #[arg(long)]
        json: bool,
    },

    /// Select an instrument and show its sales history
    Select {
        /// Instrument display name
        name: String,
        /// Lineage JSON (default: configured history file)
        #[arg(long, value_hint = ValueHint::FilePath)]
        history: Option<PathBuf>,
        /// Sales CSV (default: configured sales file)
        #[arg(long, value_hint = ValueHint::FilePath)]
        sales: Option<PathBuf>,
        /// Timeline CSV for the event labels (default: configured timeline file)
        #[arg(long, value_hint = ValueHint::FilePath)]
        timeline: Option<PathBuf>,
        /// Emit the chart update as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the timeline event and media of an instrument
    Event {
        /// Instrument display name
        name: String,
        /// Timeline CSV (default: configured timeline file)
        #[arg(long, value_hint = ValueHint::FilePath)]
        timeline: Option<PathBuf>,
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

    /// Show config paths
    Path,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },
}
