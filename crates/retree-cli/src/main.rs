mod cmd_edit;
mod cmd_find;
mod cmd_run;
mod cmd_validate;
mod output;
mod project;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "retree")]
#[command(about = "Read, edit, and search Spring configuration files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find a Spring property in a project's application configuration
    Find {
        /// Project root
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Property key, e.g. spring.application.name (globs allowed)
        #[arg(long)]
        property: String,

        /// Match the key exactly instead of with relaxed binding
        #[arg(long)]
        exact: bool,

        /// Only search projects on a matching Spring Framework version (e.g. 5.x)
        #[arg(long)]
        version_range: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a recipe described by a JSON file
    Run {
        /// Recipe file
        #[arg(long)]
        recipe: PathBuf,

        /// Project root
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the value at a dotted key path of a YAML file
    Get {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,

        /// Dotted key path, e.g. spring.application.name
        #[arg(long)]
        path: String,
    },
    /// Set the value at a dotted key path of a YAML file
    Set {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,

        /// Dotted key path, e.g. server.port
        #[arg(long)]
        path: String,

        /// New value
        #[arg(long)]
        value: String,

        /// Write the file instead of printing a diff
        #[arg(long)]
        write: bool,
    },
    /// Check that a YAML or properties file parses
    Validate {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // RUST_LOG controls verbosity; logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Find {
            root,
            property,
            exact,
            version_range,
            json,
        } => cmd_find::run(root, property, exact, version_range, json, cli.pretty),
        Commands::Run { recipe, root, json } => cmd_run::run(recipe, root, json, cli.pretty),
        Commands::Get { input, path } => cmd_edit::run_get(input, path),
        Commands::Set {
            input,
            path,
            value,
            write,
        } => cmd_edit::run_set(input, path, value, write),
        Commands::Validate { input } => cmd_validate::run(input),
    }
}
