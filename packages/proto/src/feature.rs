//! Feature records
//!
//! Field names follow the persisted JSON layout (camelCase), so a record set
//! written by one version of the plugin stays readable by the next.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a feature, unique within one record set
pub type FeatureId = u64;

/// Opaque identifier of a node in the host document.
///
/// Never parsed or rewritten on the client; it is only handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Weak reference to a visual node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub node_id: NodeId,
    pub embed_url: String,
}

/// Reference to a text-bearing node plus a cached extraction of its text.
///
/// `content` is a snapshot taken at the last refresh and may be stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRef {
    pub node_id: NodeId,
    pub embed_url: String,
    #[serde(default)]
    pub content: String,
}

/// A user-defined record pairing an estimate with tagged document nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: FeatureId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub notes: Vec<NoteRef>,
    #[serde(default, deserialize_with = "estimate")]
    pub high_estimate: f64,
    #[serde(default, deserialize_with = "estimate")]
    pub low_estimate: f64,
}

/// Non-finite estimates are written as `null`; read them back as NaN.
fn estimate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl Feature {
    /// A fresh record: empty title, zero estimates, no references
    pub fn new(id: FeatureId) -> Self {
        Self {
            id,
            title: String::new(),
            images: Vec::new(),
            notes: Vec::new(),
            high_estimate: 0.0,
            low_estimate: 0.0,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_estimates(mut self, low: f64, high: f64) -> Self {
        self.low_estimate = low;
        self.high_estimate = high;
        self
    }

    pub fn with_image(mut self, image: ImageRef) -> Self {
        self.images.push(image);
        self
    }

    pub fn with_note(mut self, note: NoteRef) -> Self {
        self.notes.push(note);
        self
    }
}

/// Identity of the open document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub file_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_json_layout() {
        let feature = Feature::new(0).with_title("Login").with_estimates(2.0, 5.0);
        let json = serde_json::to_value(&feature).unwrap();

        assert_eq!(json["id"], 0);
        assert_eq!(json["title"], "Login");
        assert_eq!(json["highEstimate"], 5.0);
        assert_eq!(json["lowEstimate"], 2.0);
        assert!(json["images"].as_array().unwrap().is_empty());
        assert!(json["notes"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_reads_integer_estimates() {
        let json = r#"{"id":3,"title":"Checkout","images":[],"notes":[
            {"nodeId":"12:7","embedUrl":"https://example.test","content":"- pay"}
        ],"highEstimate":8,"lowEstimate":3}"#;

        let feature: Feature = serde_json::from_str(json).unwrap();
        assert_eq!(feature.high_estimate, 8.0);
        assert_eq!(feature.low_estimate, 3.0);
        assert_eq!(feature.notes[0].node_id, NodeId::from("12:7"));
        assert_eq!(feature.notes[0].content, "- pay");
    }

    #[test]
    fn test_null_estimate_reads_as_nan() {
        let feature = Feature::new(1).with_estimates(f64::INFINITY, 3.0);
        let json = serde_json::to_string(&feature).unwrap();
        assert!(json.contains(r#""lowEstimate":null"#));

        let feature: Feature = serde_json::from_str(&json).unwrap();
        assert!(feature.low_estimate.is_nan());
        assert_eq!(feature.high_estimate, 3.0);

        let feature: Feature = serde_json::from_str(r#"{"id":2}"#).unwrap();
        assert_eq!(feature.low_estimate, 0.0);
    }

    #[test]
    fn test_node_id_is_transparent() {
        let id = NodeId::from("1:23");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1:23\"");
        assert_eq!(id.to_string(), "1:23");
    }
}
