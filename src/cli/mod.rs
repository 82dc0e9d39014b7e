//! CLI module for diskstore
//!
//! A thin caller over the store:
//! - save / retrieve / append JSON values
//! - exists / delete / move / rename / clear / list files
//! - posts: the save-append-retrieve demo workflow

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, PostsAction, Target};
pub use commands::{execute, open_store, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_value, read_value, write_line, write_value};
