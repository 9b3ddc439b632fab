//! Command-line surface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    name = "capmatrix",
    version,
    about = "Rate your skills against a capability matrix, flag focus areas, export the result"
)]
pub struct Args {
    /// Directory holding the saved assessment
    #[arg(long, env = "CAPMATRIX_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Catalog YAML to use instead of the built-in one
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Extra config file, applied after the default config layers
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Keep the assessment in memory only; nothing is read or saved
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive session (default)
    Shell,
    /// List disciplines
    Tabs,
    /// List skills of a discipline, optionally filtered
    List {
        /// Tab id (default: first tab with skills)
        #[arg(long)]
        tab: Option<String>,
        /// Case-insensitive text matched against names and behaviours
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Show a skill's behaviours or rubric
    Show { skill: String },
    /// Overall counts and completion
    Summary,
    /// Rate a skill; repeating the current rating clears it
    Rate {
        skill: String,
        /// na, basic, intermediate or advanced
        rating: String,
    },
    /// Toggle a skill's focus-area flag
    Focus { skill: String },
    /// Clear every rating and focus flag
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Copy the text report to the clipboard
    Copy,
    /// Write the CSV report
    Export {
        /// Output directory (default: export.dir from config, else cwd)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config,
}
