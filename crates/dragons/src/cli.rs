//! Command-line interface for the dragon catalog.
//!
//! Runs the same operations as the Lambda functions, against the real AWS
//! backends, from a terminal.
//!
//! # Example
//!
//! ```bash
//! dragons list --family Red
//! dragons list --name Bahamethut --jsonl
//! dragons validate --name Bahamethut
//! dragons add --name Cinder --family Blue --city Boise
//! dragons --bucket my-bucket --key dragons.json query "select * from S3Object[*][*] s"
//! ```

use crate::config::Settings;
use crate::domain::{Dragon, DragonFilter};
use crate::service::DragonService;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dragons_jsonl::JsonlWriter;
use std::path::PathBuf;

/// Log filter used when `RUST_LOG` is unset.
///
/// Only warnings reach stderr by default; stdout carries command output.
pub const DEFAULT_LOG_FILTER: &str = "dragons=warn,dragons_jsonl=warn";

/// Dragons - query and update the dragon catalog
///
/// The catalog location is read from SSM parameters unless `--bucket` and
/// `--key` are given.
#[derive(Parser, Debug)]
#[command(name = "dragons")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file (YAML)
    #[arg(short, long, global = true, env = "DRAGONS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bucket holding the catalog (skips the parameter lookup)
    #[arg(long, global = true)]
    pub bucket: Option<String>,

    /// Key of the catalog document (skips the parameter lookup)
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List dragons, optionally filtered
    ///
    /// With both `--family` and `--name`, dragons matching either are listed.
    List(ListArgs),

    /// Append a dragon to the catalog
    Add(AddArgs),

    /// Fail if a dragon with the given name already exists
    Validate(ValidateArgs),

    /// Run a raw select expression against the catalog
    Query(QueryArgs),
}

/// Arguments for the `list` command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Only dragons in this family
    #[arg(short, long)]
    pub family: Option<String>,

    /// Only dragons with this name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Print one JSON object per line instead of a JSON array
    #[arg(long)]
    pub jsonl: bool,
}

/// Arguments for the `add` command
#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Dragon name
    #[arg(short, long)]
    pub name: String,

    /// Family
    #[arg(short, long)]
    pub family: Option<String>,

    /// Description
    #[arg(short = 'D', long)]
    pub description: Option<String>,

    /// City
    #[arg(long)]
    pub city: Option<String>,

    /// Neighborhood
    #[arg(long)]
    pub neighborhood: Option<String>,

    /// State
    #[arg(long)]
    pub state: Option<String>,
}

impl From<AddArgs> for Dragon {
    fn from(args: AddArgs) -> Self {
        Self {
            description: args.description,
            name: Some(args.name),
            family: args.family,
            city: args.city,
            neighborhood: args.neighborhood,
            state: args.state,
        }
    }
}

/// Arguments for the `validate` command
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Dragon name to check
    #[arg(short, long)]
    pub name: String,
}

/// Arguments for the `query` command
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Select expression, e.g. "select * from S3Object[*][*] s"
    pub expression: String,

    /// Print one JSON object per line instead of a JSON array
    #[arg(long)]
    pub jsonl: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Build settings from the config file, environment and flags, in that order.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded.
    pub async fn settings(&self) -> Result<Settings> {
        let settings = match &self.config {
            Some(path) => Settings::load(path)
                .await
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => Settings::default(),
        };

        let mut settings = settings.with_env(|name| std::env::var(name).ok());
        if let Some(bucket) = &self.bucket {
            settings.bucket = Some(bucket.clone());
        }
        if let Some(key) = &self.key {
            settings.key = Some(key.clone());
        }
        Ok(settings)
    }

    /// Execute the parsed command against AWS.
    ///
    /// # Errors
    ///
    /// Returns an error if settings cannot be loaded or the operation fails.
    pub async fn execute(self) -> Result<()> {
        let settings = self.settings().await?;
        let service = crate::aws::connect(settings).await;
        run(&service, self.command).await
    }
}

/// Run `command` against `service`, printing results to stdout.
///
/// # Errors
///
/// Returns an error if the operation or writing its output fails.
pub async fn run(service: &DragonService, command: Commands) -> Result<()> {
    match command {
        Commands::List(args) => {
            let filter = DragonFilter {
                family: args.family,
                dragon_name: args.name,
            };
            let dragons = service.list(&filter).await?;
            print_dragons(&dragons, args.jsonl).await
        }
        Commands::Add(args) => {
            let message = service.add(args.into()).await?;
            println!("{message}");
            Ok(())
        }
        Commands::Validate(args) => {
            let message = service.validate(&Dragon::named(args.name)).await?;
            println!("{message}");
            Ok(())
        }
        Commands::Query(args) => {
            let dragons = service.query(args.expression).await?;
            print_dragons(&dragons, args.jsonl).await
        }
    }
}

async fn print_dragons(dragons: &[Dragon], jsonl: bool) -> Result<()> {
    if jsonl {
        let mut writer = JsonlWriter::new(tokio::io::stdout());
        writer.write_all(dragons).await?;
        writer.flush().await?;
    } else {
        println!("{}", serde_json::to_string_pretty(dragons)?);
    }
    Ok(())
}
