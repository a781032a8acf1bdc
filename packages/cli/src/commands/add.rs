use super::{print_feature, Workbench};
use crate::config::Config;
use anyhow::{anyhow, Result};
use blockscope_document::NodeId;
use blockscope_proto::TagTarget;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Document snapshot (JSON)
    pub document: PathBuf,

    /// Feature title (defaults to the first image's node name)
    #[arg(long, default_value = "")]
    pub title: String,

    /// High estimate
    #[arg(long, default_value_t = 0.0)]
    pub high: f64,

    /// Low estimate
    #[arg(long, default_value_t = 0.0)]
    pub low: f64,

    /// Node to tag as an image (repeatable)
    #[arg(long = "image")]
    pub images: Vec<String>,

    /// Node to tag as a note (repeatable)
    #[arg(long = "note")]
    pub notes: Vec<String>,
}

pub async fn add(args: AddArgs, config: &Config, _cwd: &str) -> Result<()> {
    let mut bench = Workbench::open(&args.document, config).await?;

    let id = bench.session.create_feature();
    let set = bench.session.features_mut();
    set.set_title(id, args.title.as_str())?;
    set.set_high_estimate(id, args.high)?;
    set.set_low_estimate(id, args.low)?;

    let tags = args
        .images
        .iter()
        .map(|node| (TagTarget::Image, node))
        .chain(args.notes.iter().map(|node| (TagTarget::Document, node)));

    for (target, node) in tags {
        let node_id = NodeId::from(node.as_str());
        bench.select(&node_id).await?;
        bench.session.tag_selection(id, target).await?;
    }

    bench.session.save().await?;

    let feature = bench
        .session
        .features()
        .get(id)
        .cloned()
        .ok_or_else(|| anyhow!("Feature {} disappeared", id))?;

    let doc = bench.close().await?;
    doc.write(&args.document)?;

    println!("✨ {} feature #{}", "Added".green().bold(), id);
    print_feature(&feature);
    Ok(())
}
