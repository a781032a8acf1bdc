//! Integration tests for editor crate

use blockscope_document::{DocumentRuntime, FontName, MemoryDocument, NodeId};
use blockscope_editor::{
    extract_text, FeatureStore, PresentationGenerator, BLOCKS_PAGE_NAME, JSON_FRAME_NAME,
    STORAGE_PAGE_NAME,
};
use blockscope_proto::{embed_url, Feature, ImageRef, NoteRef};

fn design_document() -> (MemoryDocument, NodeId, NodeId) {
    let mut doc = MemoryDocument::new("FILE1");
    let page = doc.current_page();

    let screen = doc.insert_frame(&page, "Login screen").unwrap();
    doc.insert_text(&screen, "Button", "Sign in", FontName::inter("Regular"))
        .unwrap();

    let notes = doc.insert_frame(&page, "Login notes").unwrap();
    doc.insert_text(&notes, "Heading", "Overview", FontName::inter("Bold"))
        .unwrap();
    doc.insert_text(&notes, "Body", "line one\nline two", FontName::inter("Regular"))
        .unwrap();

    (doc, screen, notes)
}

fn tagged_feature(screen: &NodeId, notes: &NodeId, content: &str) -> Feature {
    Feature::new(0)
        .with_title("Login")
        .with_estimates(2.0, 5.0)
        .with_image(ImageRef {
            node_id: screen.clone(),
            embed_url: embed_url("FILE1", screen),
        })
        .with_note(NoteRef {
            node_id: notes.clone(),
            embed_url: embed_url("FILE1", notes),
            content: content.to_string(),
        })
}

fn block_count(doc: &MemoryDocument) -> usize {
    doc.find_child(&doc.root(), &|node| node.name == BLOCKS_PAGE_NAME)
        .map(|page| doc.children(&page).len())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_save_then_load_single_feature() {
    let mut doc = MemoryDocument::new("FILE1");
    let store = FeatureStore::new();
    let features = vec![Feature::new(0).with_title("Login").with_estimates(2.0, 5.0)];

    store.save(&mut doc, &features).await.unwrap();

    assert_eq!(store.load(&doc), features);
}

#[tokio::test]
async fn test_roundtrip_keeps_cached_content_verbatim() {
    let (mut doc, screen, notes) = design_document();
    let store = FeatureStore::new();

    // Stale on purpose: save must not recompute it
    let features = vec![
        tagged_feature(&screen, &notes, "- outdated"),
        Feature::new(1).with_title("Signup, step 1 \"draft\""),
    ];

    store.save(&mut doc, &features).await.unwrap();
    let loaded = store.load(&doc);

    assert_eq!(loaded, features);
    assert_eq!(loaded[0].notes[0].content, "- outdated");
}

#[tokio::test]
async fn test_save_twice_matches_save_once() {
    let features = vec![Feature::new(0).with_title("Login")];

    let mut once = MemoryDocument::new("FILE1");
    FeatureStore::new().save(&mut once, &features).await.unwrap();

    let mut twice = MemoryDocument::new("FILE1");
    FeatureStore::new().save(&mut twice, &features).await.unwrap();
    FeatureStore::new().save(&mut twice, &features).await.unwrap();

    let page = twice
        .find_child(&twice.root(), &|node| node.name == STORAGE_PAGE_NAME)
        .unwrap();
    let json = twice
        .find_child(&page, &|node| node.name == JSON_FRAME_NAME)
        .unwrap();

    assert_eq!(twice.children(&twice.root()).len(), once.children(&once.root()).len());
    assert_eq!(twice.children(&page).len(), 2);
    assert_eq!(twice.children(&json).len(), 1);
    assert_eq!(FeatureStore::new().load(&twice), FeatureStore::new().load(&once));
}

#[tokio::test]
async fn test_save_replaces_previous_records() {
    let mut doc = MemoryDocument::new("FILE1");
    let store = FeatureStore::new();

    store
        .save(&mut doc, &[Feature::new(0), Feature::new(1)])
        .await
        .unwrap();
    store.save(&mut doc, &[Feature::new(5)]).await.unwrap();

    assert_eq!(store.load(&doc), vec![Feature::new(5)]);
}

#[tokio::test]
async fn test_non_finite_estimate_keeps_record_set() {
    let mut doc = MemoryDocument::new("FILE1");
    let store = FeatureStore::new();
    let features = vec![
        Feature::new(0).with_title("Feature 0").with_estimates(2.0, 5.0),
        Feature::new(1).with_title("Feature 1").with_estimates(f64::NAN, 3.0),
    ];

    store.save(&mut doc, &features).await.unwrap();
    let loaded = store.load(&doc);

    // NaN never compares equal, so check field by field
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0], features[0]);
    assert_eq!(loaded[1].id, 1);
    assert_eq!(loaded[1].title, "Feature 1");
    assert!(loaded[1].low_estimate.is_nan());
    assert_eq!(loaded[1].high_estimate, 3.0);

    // A later save of what was loaded must not drop anything
    store.save(&mut doc, &loaded).await.unwrap();
    assert_eq!(store.load(&doc).len(), 2);
}

#[test]
fn test_extract_heading_and_folded_bullet() {
    let (doc, _, notes) = design_document();
    let expected = "## Overview\n- line one - line two";

    assert_eq!(extract_text(&doc, &notes), expected);
    // Deterministic on an unchanged snapshot
    assert_eq!(extract_text(&doc, &notes), expected);
}

#[tokio::test]
async fn test_generate_twice_keeps_one_block_per_feature() {
    let (mut doc, screen, notes) = design_document();
    let features = vec![
        tagged_feature(&screen, &notes, ""),
        Feature::new(1).with_title("Signup"),
    ];
    let generator = PresentationGenerator::new();

    generator.generate(&mut doc, &features).await.unwrap();
    generator.generate(&mut doc, &features).await.unwrap();

    assert_eq!(block_count(&doc), 2);
    let pages = doc.children(&doc.root());
    let blocks_pages = pages
        .iter()
        .filter(|id| doc.node(id).unwrap().name == BLOCKS_PAGE_NAME)
        .count();
    assert_eq!(blocks_pages, 1);
}

#[tokio::test]
async fn test_generate_with_stale_reference_omits_only_that_card() {
    let (mut doc, screen, notes) = design_document();
    let stale = NodeId::from("999:1");
    let feature = tagged_feature(&screen, &notes, "").with_image(ImageRef {
        node_id: stale.clone(),
        embed_url: embed_url("FILE1", &stale),
    });

    let report = PresentationGenerator::new()
        .generate(&mut doc, &[feature])
        .await
        .unwrap();

    assert_eq!(report.blocks.len(), 1);
    assert_eq!(report.skipped, vec![stale]);

    let row = doc
        .find_child(&report.blocks[0], &|node| node.name == "Content")
        .unwrap();
    let images = doc.find_child(&row, &|node| node.name == "Images").unwrap();
    let notes_column = doc.find_child(&row, &|node| node.name == "Notes").unwrap();
    assert_eq!(doc.children(&images).len(), 1);
    assert_eq!(doc.children(&notes_column).len(), 1);
}

#[tokio::test]
async fn test_generated_cards_are_detached_copies() {
    let (mut doc, screen, notes) = design_document();
    let features = vec![tagged_feature(&screen, &notes, "")];

    let report = PresentationGenerator::new()
        .generate(&mut doc, &features)
        .await
        .unwrap();

    doc.remove(&notes).unwrap();
    doc.remove(&screen).unwrap();

    let row = doc
        .find_child(&report.blocks[0], &|node| node.name == "Content")
        .unwrap();
    let notes_column = doc.find_child(&row, &|node| node.name == "Notes").unwrap();
    let card = doc.children(&notes_column)[0].clone();
    let copy = doc.children(&card)[0].clone();

    assert_eq!(extract_text(&doc, &copy), "## Overview\n- line one - line two");
}

#[tokio::test]
async fn test_generate_focuses_page_and_notifies() {
    let (mut doc, screen, notes) = design_document();
    let features = vec![tagged_feature(&screen, &notes, "")];

    let report = PresentationGenerator::new()
        .generate(&mut doc, &features)
        .await
        .unwrap();

    assert_eq!(doc.current_page(), report.page);
    assert_eq!(doc.viewport(), report.blocks.as_slice());
    assert_eq!(
        doc.notifications().last().map(String::as_str),
        Some("Generated 1 feature block")
    );
}
