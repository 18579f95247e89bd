//! Command-line argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use taskpad_core::{EditField, FilterMode, SortMode};

pub const DEFAULT_DATA_DIR: &str = ".taskpad";

#[derive(Parser, Debug)]
#[command(
    name = "taskpad",
    version,
    about = "Single-user notes and tasks",
    after_help = "Ids may be abbreviated to any unique prefix.",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Directory holding the database, `taskpad.json` and logs.
    #[arg(long, global = true, value_name = "DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Answer yes to every confirmation.
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a record.
    Add {
        title: String,
        /// Remaining words form the body.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        body: Vec<String>,
    },

    /// Show records.
    #[command(alias = "ls")]
    List {
        /// Case-insensitive text to match in title or body.
        #[arg(long)]
        search: Option<String>,
        /// all, open or done.
        #[arg(long)]
        filter: Option<FilterMode>,
        /// created_desc, created_asc, title_asc or title_desc.
        #[arg(long)]
        sort: Option<SortMode>,
    },

    /// Flip the done flag.
    Toggle { id: String },

    /// Edit one field in place.
    Edit {
        id: String,
        field: FieldArg,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },

    /// Duplicate a record.
    #[command(name = "dup", alias = "duplicate")]
    Duplicate { id: String },

    /// Delete a record (asks first).
    #[command(name = "rm", alias = "delete")]
    Remove { id: String },

    /// Delete every record (asks first).
    Clear,

    /// Write all records as JSON.
    Export { path: Option<PathBuf> },

    /// Replace all records from a JSON export.
    Import { path: PathBuf },

    /// Toggle between the dark and light theme.
    Theme,

    /// Print the core library version.
    Version,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldArg {
    Title,
    #[value(alias = "desc")]
    Body,
}

impl From<FieldArg> for EditField {
    fn from(value: FieldArg) -> Self {
        match value {
            FieldArg::Title => Self::Title,
            FieldArg::Body => Self::Body,
        }
    }
}
