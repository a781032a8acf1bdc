//! # Presentation Generator
//!
//! Builds a page that summarizes the record set, one block per feature:
//!
//! ```text
//! page "Feature Blocks"
//! ├── block (vertical, hug)          y = 0
//! │   ├── title
//! │   ├── estimate
//! │   └── row (horizontal, hug)
//! │       ├── "Notes"  column → card → clone of note node …
//! │       └── "Images" column → card → clone of image node …
//! ├── block                          y = previous.y + previous.height + gap
//! …
//! ```
//!
//! Cards hold deep clones, so later edits to the originals never reach the
//! generated page. Blocks are placed one at a time because each offset
//! depends on the resolved height of every block before it.

use crate::EditorError;
use blockscope_document::{AutoLayout, DocumentRuntime, FontName, LayoutMode, NodeId, Padding, Rgb};
use blockscope_proto::Feature;

/// Reserved page that receives the generated blocks
pub const BLOCKS_PAGE_NAME: &str = "Feature Blocks";

/// Outcome of one generation pass
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateReport {
    pub page: NodeId,
    /// One block per feature, in record order
    pub blocks: Vec<NodeId>,
    /// Referenced nodes that no longer exist
    pub skipped: Vec<NodeId>,
}

/// Layout settings for generated pages
#[derive(Debug, Clone)]
pub struct PresentationGenerator {
    pub page_name: String,
    pub block_gap: f64,
    pub block_padding: f64,
    pub block_spacing: f64,
    pub column_gap: f64,
    pub card_padding: f64,
    pub title_font: FontName,
    pub body_font: FontName,
    pub title_size: f64,
    pub body_size: f64,
}

impl Default for PresentationGenerator {
    fn default() -> Self {
        Self {
            page_name: BLOCKS_PAGE_NAME.to_string(),
            block_gap: 100.0,
            block_padding: 40.0,
            block_spacing: 24.0,
            column_gap: 40.0,
            card_padding: 16.0,
            title_font: FontName::inter("Bold"),
            body_font: FontName::inter("Regular"),
            title_size: 32.0,
            body_size: 16.0,
        }
    }
}

impl PresentationGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build (or rebuild) the blocks page from `features`
    pub async fn generate<D: DocumentRuntime + ?Sized>(
        &self,
        doc: &mut D,
        features: &[Feature],
    ) -> Result<GenerateReport, EditorError> {
        let page = self.prepare_page(doc)?;

        doc.load_font(&self.title_font).await?;
        doc.load_font(&self.body_font).await?;

        let mut report = GenerateReport {
            page: page.clone(),
            blocks: Vec::with_capacity(features.len()),
            skipped: Vec::new(),
        };

        let mut offset = 0.0;
        for feature in features {
            let block = self.build_block(doc, &page, feature, &mut report.skipped)?;

            // Height is only final once the block's contents are laid out
            let height = doc.node(&block).map(|node| node.height).unwrap_or(0.0);
            doc.set_position(&block, 0.0, offset)?;
            offset += height + self.block_gap;

            report.blocks.push(block);
        }

        doc.set_current_page(&page)?;
        doc.scroll_and_zoom_into_view(&report.blocks);

        let count = report.blocks.len();
        let plural = if count == 1 { "" } else { "s" };
        doc.notify(&format!("Generated {} feature block{}", count, plural));

        if !report.skipped.is_empty() {
            tracing::warn!("skipped {} unusable reference(s)", report.skipped.len());
        }
        tracing::info!("generated {} block(s) on page {:?}", count, self.page_name);
        Ok(report)
    }

    /// Find-or-create the page and clear it
    fn prepare_page<D: DocumentRuntime + ?Sized>(&self, doc: &mut D) -> Result<NodeId, EditorError> {
        let root = doc.root();
        let page = match doc.find_child(&root, &|node| node.name == self.page_name) {
            Some(page) => {
                for child in doc.children(&page) {
                    doc.remove(&child)?;
                }
                page
            }
            None => {
                let page = doc.create_page();
                doc.set_name(&page, &self.page_name)?;
                page
            }
        };
        Ok(page)
    }

    fn build_block<D: DocumentRuntime + ?Sized>(
        &self,
        doc: &mut D,
        page: &NodeId,
        feature: &Feature,
        skipped: &mut Vec<NodeId>,
    ) -> Result<NodeId, EditorError> {
        let title = if feature.title.is_empty() {
            "[Untitled]"
        } else {
            feature.title.as_str()
        };

        let block = doc.create_frame();
        doc.set_name(&block, &format!("Feature {}: {}", feature.id, title))?;
        doc.append_child(page, &block)?;
        doc.set_auto_layout(
            &block,
            AutoLayout::hug(LayoutMode::Vertical)
                .with_padding(Padding::uniform(self.block_padding))
                .with_item_spacing(self.block_spacing),
        )?;
        doc.set_fills(&block, vec![Rgb::WHITE])?;
        doc.set_corner_radius(&block, 16.0)?;

        self.add_text(doc, &block, "Title", title, &self.title_font, self.title_size)?;
        let estimate = format!(
            "Estimate: {} - {}",
            feature.low_estimate, feature.high_estimate
        );
        self.add_text(doc, &block, "Estimate", &estimate, &self.body_font, self.body_size)?;

        if feature.notes.is_empty() && feature.images.is_empty() {
            return Ok(block);
        }

        let row = self.add_container(doc, &block, "Content", LayoutMode::Horizontal, self.column_gap)?;

        if !feature.notes.is_empty() {
            let column = self.add_container(doc, &row, "Notes", LayoutMode::Vertical, self.card_padding)?;
            for note in &feature.notes {
                self.add_card(doc, &column, &note.node_id, skipped)?;
            }
        }

        if !feature.images.is_empty() {
            let column = self.add_container(doc, &row, "Images", LayoutMode::Vertical, self.card_padding)?;
            for image in &feature.images {
                self.add_card(doc, &column, &image.node_id, skipped)?;
            }
        }

        Ok(block)
    }

    fn add_text<D: DocumentRuntime + ?Sized>(
        &self,
        doc: &mut D,
        parent: &NodeId,
        name: &str,
        characters: &str,
        font: &FontName,
        size: f64,
    ) -> Result<NodeId, EditorError> {
        let text = doc.create_text();
        doc.set_name(&text, name)?;
        doc.set_font(&text, font.clone())?;
        doc.set_font_size(&text, size)?;
        doc.set_characters(&text, characters)?;
        doc.append_child(parent, &text)?;
        Ok(text)
    }

    fn add_container<D: DocumentRuntime + ?Sized>(
        &self,
        doc: &mut D,
        parent: &NodeId,
        name: &str,
        mode: LayoutMode,
        spacing: f64,
    ) -> Result<NodeId, EditorError> {
        let frame = doc.create_frame();
        doc.set_name(&frame, name)?;
        doc.set_fills(&frame, Vec::new())?;
        doc.append_child(parent, &frame)?;
        doc.set_auto_layout(&frame, AutoLayout::hug(mode).with_item_spacing(spacing))?;
        Ok(frame)
    }

    /// Wrap a clone of `source` in a padded card. Stale or uncopyable ids
    /// are recorded in `skipped` and produce no card.
    fn add_card<D: DocumentRuntime + ?Sized>(
        &self,
        doc: &mut D,
        column: &NodeId,
        source: &NodeId,
        skipped: &mut Vec<NodeId>,
    ) -> Result<Option<NodeId>, EditorError> {
        if doc.node(source).is_none() {
            tracing::debug!("generate: reference {} no longer exists", source);
            skipped.push(source.clone());
            return Ok(None);
        }

        let copy = match doc.clone_node(source) {
            Ok(copy) => copy,
            Err(error) => {
                tracing::warn!("generate: cannot copy {}: {}", source, error);
                skipped.push(source.clone());
                return Ok(None);
            }
        };
        doc.set_position(&copy, 0.0, 0.0)?;

        let card = doc.create_frame();
        doc.set_name(&card, "Card")?;
        doc.set_fills(&card, vec![Rgb::gray(0.96)])?;
        doc.set_corner_radius(&card, 8.0)?;
        doc.append_child(column, &card)?;
        doc.set_auto_layout(
            &card,
            AutoLayout::hug(LayoutMode::Vertical).with_padding(Padding::uniform(self.card_padding)),
        )?;

        doc.append_child(&card, &copy)?;
        Ok(Some(card))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockscope_document::MemoryDocument;
    use blockscope_proto::{ImageRef, NoteRef};

    fn image(id: &NodeId) -> ImageRef {
        ImageRef {
            node_id: id.clone(),
            embed_url: String::new(),
        }
    }

    fn note(id: &NodeId) -> NoteRef {
        NoteRef {
            node_id: id.clone(),
            embed_url: String::new(),
            content: String::new(),
        }
    }

    #[tokio::test]
    async fn test_blocks_stack_without_overlap() {
        let mut doc = MemoryDocument::new("file");
        let page = doc.current_page();
        let screen = doc.insert_frame(&page, "Screen").unwrap();

        let features = vec![
            Feature::new(0).with_title("Login").with_image(image(&screen)),
            Feature::new(1).with_title("Signup"),
        ];

        let generator = PresentationGenerator::new();
        let report = generator.generate(&mut doc, &features).await.unwrap();

        let first = doc.node(&report.blocks[0]).unwrap();
        let second = doc.node(&report.blocks[1]).unwrap();
        assert_eq!(first.y, 0.0);
        assert_eq!(second.y, first.height + generator.block_gap);
    }

    #[tokio::test]
    async fn test_columns_only_for_non_empty_collections() {
        let mut doc = MemoryDocument::new("file");
        let page = doc.current_page();
        let screen = doc.insert_frame(&page, "Screen").unwrap();

        let features = vec![Feature::new(0).with_image(image(&screen))];
        let report = PresentationGenerator::new()
            .generate(&mut doc, &features)
            .await
            .unwrap();

        let block = report.blocks[0].clone();
        let row = doc.find_child(&block, &|node| node.name == "Content").unwrap();
        let columns: Vec<String> = doc
            .children(&row)
            .iter()
            .map(|id| doc.node(id).unwrap().name.clone())
            .collect();
        assert_eq!(columns, vec!["Images"]);
    }

    #[tokio::test]
    async fn test_untitled_feature() {
        let mut doc = MemoryDocument::new("file");
        let report = PresentationGenerator::new()
            .generate(&mut doc, &[Feature::new(7)])
            .await
            .unwrap();

        let block = doc.node(&report.blocks[0]).unwrap();
        assert_eq!(block.name, "Feature 7: [Untitled]");
        assert_eq!(block.children.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_note_is_skipped() {
        let mut doc = MemoryDocument::new("file");
        let page = doc.current_page();
        let live = doc.insert_frame(&page, "Spec").unwrap();
        let stale = NodeId::from("77:7");

        let features = vec![Feature::new(0).with_note(note(&stale)).with_note(note(&live))];
        let report = PresentationGenerator::new()
            .generate(&mut doc, &features)
            .await
            .unwrap();

        assert_eq!(report.skipped, vec![stale]);

        let row = doc
            .find_child(&report.blocks[0], &|node| node.name == "Content")
            .unwrap();
        let notes = doc.find_child(&row, &|node| node.name == "Notes").unwrap();
        assert_eq!(doc.children(&notes).len(), 1);
    }

    #[tokio::test]
    async fn test_copy_sits_inside_card_padding() {
        let mut doc = MemoryDocument::new("file");
        let page = doc.current_page();
        let screen = doc.insert_frame(&page, "Screen").unwrap();
        doc.set_position(&screen, 240.0, 80.0).unwrap();

        let generator = PresentationGenerator::new();
        let report = generator
            .generate(&mut doc, &[Feature::new(0).with_image(image(&screen))])
            .await
            .unwrap();

        let row = doc
            .find_child(&report.blocks[0], &|node| node.name == "Content")
            .unwrap();
        let images = doc.find_child(&row, &|node| node.name == "Images").unwrap();
        let card = doc.children(&images)[0].clone();
        let copy = doc.node(&doc.children(&card)[0]).unwrap();

        assert_eq!(copy.x, generator.card_padding);
        assert_eq!(copy.y, generator.card_padding);
    }

    #[tokio::test]
    async fn test_uncopyable_reference_is_skipped() {
        let mut doc = MemoryDocument::new("file");
        let page = doc.current_page();
        let live = doc.insert_frame(&page, "Screen").unwrap();
        let root = doc.root();

        let features = vec![Feature::new(0).with_image(image(&root)).with_image(image(&live))];
        let report = PresentationGenerator::new()
            .generate(&mut doc, &features)
            .await
            .unwrap();

        assert_eq!(report.blocks.len(), 1);
        assert_eq!(report.skipped, vec![root]);

        let row = doc
            .find_child(&report.blocks[0], &|node| node.name == "Content")
            .unwrap();
        let images = doc.find_child(&row, &|node| node.name == "Images").unwrap();
        assert_eq!(doc.children(&images).len(), 1);
    }
}
