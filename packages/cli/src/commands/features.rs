use super::{print_feature, Workbench};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct FeaturesArgs {
    /// Document snapshot (JSON)
    pub document: PathBuf,
}

pub async fn features(args: FeaturesArgs, config: &Config, _cwd: &str) -> Result<()> {
    let bench = Workbench::open(&args.document, config).await?;
    let set = bench.session.features();

    if set.is_empty() {
        println!("No features stored in {}", args.document.display());
    } else {
        println!(
            "📋 {} {} feature(s) in {}",
            "Found".green().bold(),
            set.len(),
            args.document.display()
        );
        println!();
        for feature in set.sorted_newest_first() {
            print_feature(feature);
        }
    }

    bench.close().await?;
    Ok(())
}
