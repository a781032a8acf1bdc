//! # Blockscope Document
//!
//! The host side owns a hierarchical visual document that the rest of the
//! system can only reach through a narrow capability set.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ DocumentRuntime: capability trait           │
//! │  - lookup / find child                      │
//! │  - create, clone, append, remove            │
//! │  - resize, layout, fills, text properties   │
//! │  - selection, viewport, notifications       │
//! └─────────────────────────────────────────────┘
//!                     ↑
//! ┌─────────────────────────────────────────────┐
//! │ MemoryDocument: arena-backed implementation │
//! │  - JSON snapshots on disk                   │
//! │  - auto-layout resolution after mutations   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Nodes are addressed only by opaque [`NodeId`]s. A [`Visitor`] walks a
//! subtree in document order.

mod errors;
mod layout;
mod memory;
mod node;
mod runtime;
mod visitor;

pub use errors::DocumentError;
pub use layout::{measure_text, resolve_auto_layout};
pub use memory::MemoryDocument;
pub use node::{AutoLayout, FontName, FrameProps, LayoutMode, Node, NodeData, Padding, Rgb, Sizing, TextProps};
pub use runtime::DocumentRuntime;
pub use visitor::{walk_node, Visitor};

// Re-export the id type so callers don't need the proto crate for it
pub use blockscope_proto::NodeId;
