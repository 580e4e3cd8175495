//! mbent CLI: the `mbent` command.

mod cli;
mod commands;
mod config;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the log filter, e.g. `MBENT_LOG=debug`.
const LOG_ENV: &str = "MBENT_LOG";

fn main() {
    init_logging();
    let cli = Cli::parse();
    let config = support::load_config_or_exit(cli.config.as_deref());

    match cli.command {
        Commands::Schema {
            out,
            marker,
            title,
            json,
        } => commands::schema::run(
            commands::schema::Args {
                out,
                marker,
                title,
                json,
            },
            &config.schema,
        ),

        Commands::Render { file, keep_going } => {
            commands::render::run(file, keep_going || config.render.keep_going)
        }

        Commands::Check { file, json } => commands::check::run(file, json),

        Commands::Variants { json } => commands::variants::run(json),
    }
}

/// Logs go to stderr so stdout stays parseable.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
