//! `gdelt query` and `gdelt aql` - analytical queries against the graph.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use gdelt_graph::{queries, GraphStore, JsonMap};

use super::StoreArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Minimum Goldstein scale for an event to be included
    #[arg(long, default_value_t = 5.0)]
    pub min_goldstein: f64,
}

pub async fn execute(store_args: &StoreArgs, args: QueryArgs) -> Result<()> {
    let store = store_args.connect().await?;
    let events = queries::high_intensity_events(&store, args.min_goldstein).await?;

    if events.is_empty() {
        println!("{}", "No matching events.".dimmed());
        return Ok(());
    }
    output::print_high_intensity_events(&events);
    Ok(())
}

/// Raw AQL passthrough, one JSON document per line.
pub async fn execute_raw(store_args: &StoreArgs, aql: &str) -> Result<()> {
    let store = store_args.connect().await?;
    let rows = store.query(aql, JsonMap::new()).await?;

    if rows.is_empty() {
        println!("{}", "No results.".dimmed());
    } else {
        for (i, row) in rows.iter().enumerate() {
            println!("{}: {}", (i + 1).to_string().dimmed(), row);
        }
    }
    Ok(())
}
