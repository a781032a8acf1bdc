//! Blockscope record and message definitions
//!
//! This crate defines the data shared by both sides of the plugin:
//! - Feature records (estimates plus tagged document references)
//! - Client ↔ host messages, JSON-encoded with a `type` discriminant
//! - Deep-link URLs for referenced nodes

pub mod feature;
pub mod link;
pub mod messages;

pub use feature::*;
pub use link::*;
pub use messages::*;
