use super::Workbench;
use crate::config::Config;
use anyhow::Result;
use blockscope_document::NodeId;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Document snapshot (JSON)
    pub document: PathBuf,

    /// Node whose text to extract
    pub node_id: String,
}

pub async fn extract(args: ExtractArgs, config: &Config, _cwd: &str) -> Result<()> {
    let mut bench = Workbench::open(&args.document, config).await?;

    let content = bench
        .session
        .refresh_note(NodeId::from(args.node_id.as_str()))
        .await?;

    if content.is_empty() {
        eprintln!("{} no text under {}", "Warning:".yellow().bold(), args.node_id);
    } else {
        println!("{}", content);
    }

    bench.close().await?;
    Ok(())
}
