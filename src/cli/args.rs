//! CLI argument definitions using clap
//!
//! Commands:
//! - diskstore save <location> <path> [--input <file>]
//! - diskstore retrieve <location> <path>
//! - diskstore append <location> <path> [--input <file>]
//! - diskstore exists | delete | move | rename | clear | list
//! - diskstore posts save | show

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::location::StorageLocation;

/// diskstore - typed file-backed record storage
#[derive(Parser, Debug)]
#[command(name = "diskstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Keep every location under this directory (overrides config)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// A file under a storage location
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// documents, caches, temporary, applicationSupport or shared
    pub location: StorageLocation,

    /// Path relative to the location root
    pub path: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replace a file with a JSON value
    Save {
        #[command(flatten)]
        target: Target,

        /// Read the value from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Print the JSON value stored in a file
    Retrieve {
        #[command(flatten)]
        target: Target,
    },

    /// Append a JSON value to the array stored in a file
    Append {
        #[command(flatten)]
        target: Target,

        /// Read the value from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Print whether a file exists
    Exists {
        #[command(flatten)]
        target: Target,
    },

    /// Remove a file
    Delete {
        #[command(flatten)]
        target: Target,

        /// Fail if the file does not exist
        #[arg(long)]
        strict: bool,
    },

    /// Move a file, possibly to another location
    Move {
        from_location: StorageLocation,
        from: String,
        to_location: StorageLocation,
        to: String,
    },

    /// Rename a file within its location
    Rename {
        #[command(flatten)]
        target: Target,

        /// New path relative to the same location
        to: String,
    },

    /// Remove everything stored under a location
    Clear { location: StorageLocation },

    /// List files in a directory of a location
    List {
        location: StorageLocation,

        /// Directory relative to the location root
        dir: Option<String>,
    },

    /// Demo workflow over documents/posts.json
    Posts {
        #[command(subcommand)]
        action: PostsAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum PostsAction {
    /// Save the sample posts and append one more
    Save,
    /// Print the saved posts
    Show,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
