use super::Workbench;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Document snapshot (JSON)
    pub document: PathBuf,
}

pub async fn generate(args: GenerateArgs, config: &Config, _cwd: &str) -> Result<()> {
    let bench = Workbench::open(&args.document, config).await?;
    bench.session.generate_blocks_page().await?;

    let doc = bench.close().await?;
    doc.write(&args.document)?;

    for notification in doc.notifications() {
        println!("🧱 {}", notification);
    }
    println!("✨ {} {}", "Updated".green().bold(), args.document.display());
    Ok(())
}
