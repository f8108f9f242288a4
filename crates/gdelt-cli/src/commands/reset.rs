//! `gdelt reset` - destructive environment reset.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use gdelt_graph::drop_non_system_collections;

use super::StoreArgs;

#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Confirm dropping every non-system collection
    #[arg(long)]
    pub yes: bool,
}

pub async fn execute(store_args: &StoreArgs, args: ResetArgs) -> Result<()> {
    if !args.yes {
        println!(
            "{}",
            "This drops every non-system collection in the database. Re-run with --yes to confirm."
                .yellow()
        );
        return Ok(());
    }

    let store = store_args.connect().await?;
    let dropped = drop_non_system_collections(&store).await?;
    println!("{} {}", "Collections dropped:".green().bold(), dropped);
    Ok(())
}
