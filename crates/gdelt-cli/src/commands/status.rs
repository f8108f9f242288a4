//! `gdelt status` - document counts for the target collections.

use anyhow::Result;
use colored::Colorize;

use gdelt_core::mapper::{ACTORS, EVENTS, LOCATIONS, RELATIONS};
use gdelt_graph::GraphStore;

use super::StoreArgs;

pub async fn execute(store_args: &StoreArgs) -> Result<()> {
    let store = store_args.connect().await?;

    println!("{}", "Graph status".bold());
    println!("{}", "─".repeat(30));
    for name in [EVENTS, ACTORS, LOCATIONS, RELATIONS] {
        if !store.has_collection(name).await? {
            println!("  {:<16} {}", name, "missing".dimmed());
            continue;
        }
        let count = store.document_count(name).await?;
        println!("  {:<16} {}", name, count.to_string().cyan());
    }
    Ok(())
}
