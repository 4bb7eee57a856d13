//! Entry point for the `texkit` command-line tool, which exposes texture format
//! inference, color parsing, the packed-vector codec, 2D transforms and overlap
//! tests as subcommands.
//!
//! Types:
//!
//! - None; the report types live in `run.rs` next to their handlers.
//!
//! Functions:
//!
//! - `main` parses CLI input, initialises tracing, and dispatches to `run::run`.

mod cli;
mod paths;
mod run;

use anyhow::Result;
use run::Session;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    let session = Session {
        json: cli.json,
        config: cli.config,
    };
    run::run(&session, cli.command)
}
