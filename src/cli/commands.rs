//! CLI command implementations
//!
//! Commands are thin callers: they open a store, invoke one operation,
//! and print the outcome. Errors propagate to `main`, which prints them
//! and exits non-zero.

use std::path::Path;

use serde_json::Value;

use crate::config::StoreConfig;
use crate::fault_point::FaultPoint;
use crate::post::{load_posts, render_posts, sample_posts, save_posts, NO_POSTS_MESSAGE};
use crate::store::{DeleteMode, FileStore};

use super::args::{Cli, Command, PostsAction};
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::{read_value, write_line, write_value};

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args())
}

/// Open the store and run one command
pub fn run_command(cli: Cli) -> CliResult<()> {
    let mut store = open_store(cli.config.as_deref(), cli.root.as_deref())?;
    let fault = FaultPoint::from_env()
        .map_err(|msg| CliError::new(CliErrorCode::ConfigError, msg))?;
    if let Some(point) = fault {
        store = store.with_fault_point(point);
    }
    execute(&store, cli.command)
}

/// Build a store from an optional config file and root override
pub fn open_store(config: Option<&Path>, root: Option<&Path>) -> CliResult<FileStore> {
    let mut config = match config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };
    if let Some(root) = root {
        config.root = Some(root.to_path_buf());
    }
    Ok(config.build_store()?)
}

/// Run a command against an open store
pub fn execute(store: &FileStore, cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Save { target, input } => {
            let value = read_value(input.as_deref())?;
            store.save(target.location, &target.path, &value)?;
            write_line(&format!("saved {}/{}", target.location, target.path))
        }
        Command::Retrieve { target } => {
            let value: Value = store.retrieve(target.location, &target.path)?;
            write_value(&value)
        }
        Command::Append { target, input } => {
            let value = read_value(input.as_deref())?;
            store.append(target.location, &target.path, value)?;
            write_line(&format!("appended to {}/{}", target.location, target.path))
        }
        Command::Exists { target } => {
            let exists = store.exists(target.location, &target.path)?;
            write_line(if exists { "true" } else { "false" })
        }
        Command::Delete { target, strict } => {
            let mode = if strict {
                DeleteMode::Strict
            } else {
                DeleteMode::Lenient
            };
            store.delete(target.location, &target.path, mode)?;
            write_line(&format!("deleted {}/{}", target.location, target.path))
        }
        Command::Move {
            from_location,
            from,
            to_location,
            to,
        } => {
            store.move_file(from_location, &from, to_location, &to)?;
            write_line(&format!(
                "moved {}/{} to {}/{}",
                from_location, from, to_location, to
            ))
        }
        Command::Rename { target, to } => {
            store.rename(target.location, &target.path, &to)?;
            write_line(&format!(
                "renamed {}/{} to {}",
                target.location, target.path, to
            ))
        }
        Command::Clear { location } => {
            store.clear(location)?;
            write_line(&format!("cleared {}", location))
        }
        Command::List { location, dir } => {
            for name in store.list(location, dir.as_deref())? {
                write_line(&name)?;
            }
            Ok(())
        }
        Command::Posts { action } => posts(store, action),
    }
}

fn posts(store: &FileStore, action: PostsAction) -> CliResult<()> {
    match action {
        PostsAction::Save => {
            let posts = sample_posts();
            let appended = save_posts(store, &posts)?;
            write_line(&format!(
                "Saved {} posts to disk (appended #{})",
                posts.len() + 1,
                appended.id
            ))
        }
        PostsAction::Show => match load_posts(store) {
            Ok(posts) => write_line(render_posts(&posts).trim_end()),
            Err(e) if e.is_not_found() => write_line(NO_POSTS_MESSAGE),
            Err(e) => Err(e.into()),
        },
    }
}
