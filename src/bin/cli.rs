//! sealkv CLI
//!
//! Command-line interface for a local sealkv store.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sealkv::{Config, Store, StoreError};
use tracing_subscriber::{fmt, EnvFilter};

/// sealkv CLI
#[derive(Parser, Debug)]
#[command(name = "sealkv-cli")]
#[command(about = "CLI for the sealkv encrypted key-value store")]
#[command(version)]
struct Args {
    /// Database file (default: ~/.default.store)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Bucket to operate on
    #[arg(short, long, default_value = sealkv::config::DEFAULT_BUCKET)]
    bucket: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// List keys in the bucket
    Keys,

    /// List buckets
    Buckets,

    /// Delete a bucket and everything in it
    DropBucket {
        /// The bucket to delete
        name: String,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), StoreError> {
    let mut builder = Config::builder().bucket(&args.bucket);
    if let Some(path) = &args.path {
        builder = builder.path(path);
    }

    let store = Store::open(builder.build())?;

    let result = match args.command {
        Commands::Get { key } => store.get::<String>(&key).map(|value| println!("{}", value)),
        Commands::Set { key, value } => store.set(&key, &value),
        Commands::Del { key } => store.delete(&key),
        Commands::Keys => store.keys().map(|keys| keys.iter().for_each(|k| println!("{}", k))),
        Commands::Buckets => store
            .buckets()
            .map(|names| names.iter().for_each(|n| println!("{}", n))),
        Commands::DropBucket { name } => store.delete_bucket(&name),
    };

    store.close()?;
    result
}
