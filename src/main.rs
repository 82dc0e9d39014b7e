//! diskstore CLI entry point
//!
//! This is a minimal entrypoint that:
//! 1. Installs the logger (level from RUST_LOG)
//! 2. Dispatches to CLI commands (via cli::run)
//! 3. Prints errors to stderr
//! 4. Exits with non-zero on failure

use diskstore::cli;

fn main() {
    env_logger::init();

    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
