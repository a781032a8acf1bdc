use super::Workbench;
use crate::config::Config;
use anyhow::Result;
use blockscope_document::NodeId;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct FocusArgs {
    /// Document snapshot (JSON)
    pub document: PathBuf,

    /// Node to bring into view
    pub node_id: String,
}

pub async fn focus(args: FocusArgs, config: &Config, _cwd: &str) -> Result<()> {
    let node_id = NodeId::from(args.node_id.as_str());
    let bench = Workbench::open(&args.document, config).await?;
    bench.session.focus(node_id.clone()).await?;

    let doc = bench.close().await?;

    if doc.viewport() != [node_id] {
        eprintln!("{} node {} not found", "Warning:".yellow().bold(), args.node_id);
        return Ok(());
    }

    doc.write(&args.document)?;
    println!("🔎 {} {}", "Focused".green().bold(), args.node_id);
    Ok(())
}
