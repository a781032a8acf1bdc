use super::Workbench;
use crate::config::Config;
use anyhow::{anyhow, Result};
use blockscope_proto::FeatureId;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Document snapshot (JSON)
    pub document: PathBuf,

    /// Id of the feature to remove
    pub id: FeatureId,
}

pub async fn remove(args: RemoveArgs, config: &Config, _cwd: &str) -> Result<()> {
    let mut bench = Workbench::open(&args.document, config).await?;

    if !bench.session.remove_feature(args.id) {
        return Err(anyhow!("Feature not found: {}", args.id));
    }
    bench.session.save().await?;

    let doc = bench.close().await?;
    doc.write(&args.document)?;

    println!("🗑  {} feature #{}", "Removed".green().bold(), args.id);
    Ok(())
}
