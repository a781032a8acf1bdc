mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    add, export, extract, features, focus, generate, remove, AddArgs, ExportArgs, ExtractArgs,
    FeaturesArgs, FocusArgs, GenerateArgs, RemoveArgs,
};
use config::Config;

/// Blockscope CLI - Feature records stored inside design documents
#[derive(Parser, Debug)]
#[command(name = "blockscope")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Request timeout in milliseconds (overrides config)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stored features, newest first
    Features(FeaturesArgs),

    /// Create a feature, tag nodes onto it and save
    Add(AddArgs),

    /// Remove a feature and save
    Remove(RemoveArgs),

    /// Print the text extracted from a node
    Extract(ExtractArgs),

    /// Refresh every note and write the features as CSV
    Export(ExportArgs),

    /// Build the feature blocks page
    Generate(GenerateArgs),

    /// Bring a node into view
    Focus(FocusArgs),
}

async fn run(cli: Cli, cwd: &str) -> anyhow::Result<()> {
    let mut config = Config::load(cwd)?;
    if let Some(timeout_ms) = cli.timeout_ms {
        config.request_timeout_ms = timeout_ms;
    }

    match cli.command {
        Command::Features(args) => features(args, &config, cwd).await,
        Command::Add(args) => add(args, &config, cwd).await,
        Command::Remove(args) => remove(args, &config, cwd).await,
        Command::Extract(args) => extract(args, &config, cwd).await,
        Command::Export(args) => export(args, &config, cwd).await,
        Command::Generate(args) => generate(args, &config, cwd).await,
        Command::Focus(args) => focus(args, &config, cwd).await,
    }
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output can be piped
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match std::env::current_dir() {
        Ok(cwd) => run(cli, &cwd.display().to_string()).await,
        Err(err) => Err(anyhow::anyhow!("Cannot get current directory: {}", err)),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
