//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use gdelt_graph::{ArangoStore, StoreConfig};

pub mod load;
pub mod query;
pub mod reset;
pub mod status;

/// Connection flags shared by every subcommand. Each falls back to an
/// environment variable, then to the local-development default.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// ArangoDB endpoint URL
    #[arg(long, global = true, env = "ARANGO_URL", default_value = "http://localhost:8529")]
    pub endpoint: String,

    /// Store username
    #[arg(long, global = true, env = "ARANGO_USERNAME", default_value = "root")]
    pub username: String,

    /// Store password
    #[arg(long, global = true, env = "ARANGO_PASSWORD", default_value = "")]
    pub password: String,

    /// Target database name
    #[arg(long, global = true, env = "ARANGO_DATABASE", default_value = "Gdelt_DB")]
    pub database: String,
}

impl StoreArgs {
    fn to_config(&self) -> StoreConfig {
        StoreConfig {
            endpoint: self.endpoint.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
        }
    }

    pub async fn connect(&self) -> Result<ArangoStore> {
        ArangoStore::connect(&self.to_config())
            .await
            .context("Failed to connect to the graph store")
    }
}

/// GDELT Graph - Event Feed Graph Loader
#[derive(Parser)]
#[command(name = "gdelt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the most recent CSV export into the graph
    Load(load::LoadArgs),

    /// Query high-intensity events with actor/location context
    Query(query::QueryArgs),

    /// Execute a raw AQL query
    Aql {
        /// AQL query string
        query: String,
    },

    /// Show document counts for the target collections
    Status,

    /// Drop every non-system collection in the database
    Reset(reset::ResetArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Load(args) => load::execute(&self.store, args).await,
            Commands::Query(args) => query::execute(&self.store, args).await,
            Commands::Aql { query } => query::execute_raw(&self.store, &query).await,
            Commands::Status => status::execute(&self.store).await,
            Commands::Reset(args) => reset::execute(&self.store, args).await,
        }
    }
}
