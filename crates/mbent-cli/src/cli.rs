use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mbent",
    about = "mbent: validated MBDyn drive callers, rendered to input lines and described as JSON Schema",
    version
)]
pub struct Cli {
    /// Path to a TOML configuration file (defaults to ./mbent.toml when present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export the JSON Schema of every registered drive variant
    Schema {
        /// Write the schema to this path instead of stdout
        #[arg(long)]
        out: Option<String>,

        /// URI drive documents reference under `$schema`
        #[arg(long)]
        marker: Option<String>,

        /// Schema title
        #[arg(long)]
        title: Option<String>,

        /// Output the write summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a drive document (JSON or TOML) as MBDyn input lines
    Render {
        /// Drive document path
        file: String,

        /// Print every valid drive and report every failing one
        #[arg(long)]
        keep_going: bool,
    },

    /// Validate a drive document and report every issue
    Check {
        /// Drive document path
        file: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List registered drive variants and their fields
    Variants {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
