use super::Workbench;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Document snapshot (JSON)
    pub document: PathBuf,

    /// Output file (overrides config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn export(args: ExportArgs, config: &Config, cwd: &str) -> Result<()> {
    let mut bench = Workbench::open(&args.document, config).await?;

    let csv = bench.session.export_csv().await;
    let path = match args.output {
        Some(path) => path,
        None => config
            .get_csv_out_dir(cwd)
            .join(bench.session.csv_file_name().await?),
    };
    let rows = bench.session.features().len();
    bench.close().await?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, csv)?;

    println!(
        "📄 {} {} feature(s) → {}",
        "Exported".green().bold(),
        rows,
        path.display()
    );
    Ok(())
}
