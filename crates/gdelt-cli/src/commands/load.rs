//! `gdelt load` - run the full CSV-to-graph load pipeline.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use gdelt_graph::{run_load, LoadOutcome};

use super::StoreArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Directory scanned for CSV exports; the newest one is loaded
    #[arg(long, env = "GDELT_INPUT_DIR", default_value = "./exports")]
    pub input_dir: PathBuf,
}

pub async fn execute(store_args: &StoreArgs, args: LoadArgs) -> Result<()> {
    let store = store_args.connect().await?;

    match run_load(&store, &args.input_dir).await? {
        LoadOutcome::NoInput => {
            println!(
                "{} {}",
                "No CSV files found in".yellow(),
                args.input_dir.display()
            );
        }
        LoadOutcome::Completed(report) => output::print_load_report(&report),
    }

    Ok(())
}
