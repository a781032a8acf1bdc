pub mod add;
pub mod export;
pub mod extract;
pub mod features;
pub mod focus;
pub mod generate;
pub mod remove;

pub use add::{add, AddArgs};
pub use export::{export, ExportArgs};
pub use extract::{extract, ExtractArgs};
pub use features::{features, FeaturesArgs};
pub use focus::{focus, FocusArgs};
pub use generate::{generate, GenerateArgs};
pub use remove::{remove, RemoveArgs};

use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use blockscope_client::{ClientConfig, ClientSession};
use blockscope_document::{MemoryDocument, NodeId};
use blockscope_proto::Feature;
use blockscope_workspace::HostServer;
use colored::Colorize;
use std::path::Path;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A document snapshot opened behind a running host, with a connected
/// client that has already loaded the stored features
pub struct Workbench {
    pub session: ClientSession,
    selections: mpsc::Sender<Vec<NodeId>>,
    host: JoinHandle<MemoryDocument>,
}

impl Workbench {
    pub async fn open(path: &Path, config: &Config) -> Result<Self> {
        let doc = MemoryDocument::open(path)
            .with_context(|| format!("Cannot open document {}", path.display()))?;
        tracing::debug!("[cli] opened {} ({} nodes)", path.display(), doc.len());

        let host = HostServer::new(doc).spawn(config.channel_capacity);
        let session = ClientSession::connect(
            host.messages,
            host.responses,
            ClientConfig {
                request_timeout: config.request_timeout(),
            },
        );

        let mut bench = Self {
            session,
            selections: host.selections,
            host: host.task,
        };
        bench.session.load().await?;
        Ok(bench)
    }

    /// Select a single node in the host, as a user would before tagging
    pub async fn select(&mut self, node_id: &NodeId) -> Result<()> {
        self.selections
            .send(vec![node_id.clone()])
            .await
            .map_err(|_| anyhow!("Host stopped"))?;

        let selection = self.session.selection_changed().await?;
        if selection.first() != Some(node_id) {
            return Err(anyhow!("Node not found: {}", node_id));
        }
        Ok(())
    }

    /// Stop the host once every queued message is processed and return the
    /// resulting document
    pub async fn close(self) -> Result<MemoryDocument> {
        let Workbench {
            session,
            selections,
            host,
        } = self;

        session.disconnect();
        drop(selections);
        Ok(host.await?)
    }
}

fn print_feature(feature: &Feature) {
    let title = if feature.title.is_empty() {
        "[Untitled]".dimmed().to_string()
    } else {
        feature.title.bold().to_string()
    };

    println!(
        "   {} {}  ({} - {})",
        format!("#{}", feature.id).cyan(),
        title,
        feature.low_estimate,
        feature.high_estimate
    );
    println!(
        "      notes: {}  images: {}",
        feature.notes.len(),
        feature.images.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockscope_document::{DocumentRuntime, FontName};
    use blockscope_workspace::FeatureStore;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        document: PathBuf,
        screen: NodeId,
        notes: NodeId,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let document = dir.path().join("design.json");

        let mut doc = MemoryDocument::new("FILE1");
        let page = doc.current_page();
        let screen = doc.insert_frame(&page, "Login screen").unwrap();
        let notes = doc.insert_frame(&page, "Login notes").unwrap();
        doc.insert_text(&notes, "Heading", "Overview", FontName::inter("Bold"))
            .unwrap();
        doc.insert_text(&notes, "Body", "email, password", FontName::inter("Regular"))
            .unwrap();
        doc.write(&document).unwrap();

        Fixture {
            dir,
            document,
            screen,
            notes,
        }
    }

    fn stored(path: &Path) -> Vec<Feature> {
        let doc = MemoryDocument::open(path).unwrap();
        FeatureStore::new().load(&doc)
    }

    fn add_args(fixture: &Fixture, title: &str) -> AddArgs {
        AddArgs {
            document: fixture.document.clone(),
            title: title.to_string(),
            high: 5.0,
            low: 2.0,
            images: vec![fixture.screen.to_string()],
            notes: vec![fixture.notes.to_string()],
        }
    }

    #[tokio::test]
    async fn test_add_persists_tagged_feature() {
        let fixture = fixture();
        let cwd = fixture.dir.path().display().to_string();

        add(add_args(&fixture, ""), &Config::default(), &cwd)
            .await
            .unwrap();

        let features = stored(&fixture.document);
        assert_eq!(features.len(), 1);
        let feature = &features[0];
        assert_eq!(feature.title, "Login screen");
        assert_eq!(feature.high_estimate, 5.0);
        assert_eq!(feature.images[0].node_id, fixture.screen);
        assert_eq!(feature.notes[0].content, "## Overview\n- email, password");
    }

    #[tokio::test]
    async fn test_add_unknown_node_fails_without_writing() {
        let fixture = fixture();
        let cwd = fixture.dir.path().display().to_string();
        let mut args = add_args(&fixture, "Login");
        args.images = vec!["404:1".to_string()];

        assert!(add(args, &Config::default(), &cwd).await.is_err());
        assert!(stored(&fixture.document).is_empty());
    }

    #[tokio::test]
    async fn test_add_then_remove() {
        let fixture = fixture();
        let cwd = fixture.dir.path().display().to_string();
        let config = Config::default();

        add(add_args(&fixture, "Login"), &config, &cwd).await.unwrap();
        add(add_args(&fixture, "Signup"), &config, &cwd).await.unwrap();

        let ids: Vec<_> = stored(&fixture.document).iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![0, 1]);

        remove(
            RemoveArgs {
                document: fixture.document.clone(),
                id: 0,
            },
            &config,
            &cwd,
        )
        .await
        .unwrap();

        let remaining = stored(&fixture.document);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "Signup");

        let missing = RemoveArgs {
            document: fixture.document.clone(),
            id: 0,
        };
        assert!(remove(missing, &config, &cwd).await.is_err());
    }

    #[tokio::test]
    async fn test_export_writes_csv_to_configured_dir() {
        let fixture = fixture();
        let cwd = fixture.dir.path().display().to_string();
        let config = Config {
            csv_out_dir: "out".to_string(),
            ..Config::default()
        };

        add(add_args(&fixture, "Login"), &config, &cwd).await.unwrap();
        export(
            ExportArgs {
                document: fixture.document.clone(),
                output: None,
            },
            &config,
            &cwd,
        )
        .await
        .unwrap();

        let csv = std::fs::read_to_string(fixture.dir.path().join("out/features-FILE1.csv")).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("0,Login,5,2,"));
        assert!(lines[1].contains("\"## Overview - email, password\""));
    }

    #[tokio::test]
    async fn test_generate_writes_blocks_page() {
        let fixture = fixture();
        let cwd = fixture.dir.path().display().to_string();
        let config = Config::default();

        add(add_args(&fixture, "Login"), &config, &cwd).await.unwrap();
        generate(
            GenerateArgs {
                document: fixture.document.clone(),
            },
            &config,
            &cwd,
        )
        .await
        .unwrap();

        let doc = MemoryDocument::open(&fixture.document).unwrap();
        let page = doc
            .find_child(&doc.root(), &|node| node.name == "Feature Blocks")
            .unwrap();
        assert_eq!(doc.children(&page).len(), 1);
        assert_eq!(doc.current_page(), page);
    }

    #[tokio::test]
    async fn test_missing_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        let args = FeaturesArgs {
            document: dir.path().join("missing.json"),
        };

        assert!(features(args, &Config::default(), &cwd).await.is_err());
    }
}
