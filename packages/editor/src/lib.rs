//! # Blockscope Editor
//!
//! Host-side document operations performed on behalf of the client.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ extract: node subtree → markdown-ish text   │
//! └─────────────────────────────────────────────┘
//! ┌─────────────────────────────────────────────┐
//! │ store: feature records ⇄ reserved page      │
//! │  - find-or-create containers                │
//! │  - destructive replace on save              │
//! │  - best-effort load                         │
//! └─────────────────────────────────────────────┘
//! ┌─────────────────────────────────────────────┐
//! │ generator: feature records → blocks page    │
//! │  - one auto-layout block per feature        │
//! │  - cards wrap deep clones of tagged nodes   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Client state is the source of truth**: the document only mirrors it
//! 2. **Replace, never diff**: saves and generation clear before writing
//! 3. **Degrade on stale references**: a missing node never fails an operation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockscope_editor::{extract_text, FeatureStore, PresentationGenerator};
//!
//! let store = FeatureStore::default();
//! store.save(&mut doc, &features).await?;
//! assert_eq!(store.load(&doc), features);
//!
//! let report = PresentationGenerator::default().generate(&mut doc, &features).await?;
//! ```

mod errors;
mod extract;
mod generator;
mod store;

pub use errors::EditorError;
pub use extract::{extract_text, TextExtractor, HEADING_WEIGHT_THRESHOLD};
pub use generator::{GenerateReport, PresentationGenerator, BLOCKS_PAGE_NAME};
pub use store::{FeatureStore, IMAGES_FRAME_NAME, JSON_FRAME_NAME, STORAGE_PAGE_NAME};
