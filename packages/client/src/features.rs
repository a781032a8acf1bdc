//! # Feature Set
//!
//! The client's in-memory record set. It is the single source of truth for
//! every field except note `content`, which is a cached extraction that the
//! host refreshes on request.
//!
//! Ids come from a counter kept next to the records, so deleting a feature
//! and creating another never reuses an id:
//!
//! ```text
//! create → 0, create → 1, remove 0, create → 2
//! ```

use crate::ClientError;
use blockscope_proto::{embed_url, Feature, FeatureId, HostMessage, ImageRef, NodeId, NoteRef, TagTarget};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSet {
    features: Vec<Feature>,
    next_id: FeatureId,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_features(features: Vec<Feature>) -> Self {
        let mut set = Self::new();
        set.replace_all(features);
        set
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Id the next created feature will get
    pub fn next_id(&self) -> FeatureId {
        self.next_id
    }

    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.features.iter().find(|feature| feature.id == id)
    }

    fn get_mut(&mut self, id: FeatureId) -> Result<&mut Feature, ClientError> {
        self.features
            .iter_mut()
            .find(|feature| feature.id == id)
            .ok_or(ClientError::FeatureNotFound(id))
    }

    /// Append an empty feature with a fresh id
    pub fn create(&mut self) -> FeatureId {
        let id = self.next_id;
        self.next_id += 1;
        self.features.push(Feature::new(id));
        id
    }

    /// Drop a feature. Nodes it referenced are left alone in the document.
    pub fn remove(&mut self, id: FeatureId) -> Option<Feature> {
        let index = self.features.iter().position(|feature| feature.id == id)?;
        Some(self.features.remove(index))
    }

    pub fn set_title(&mut self, id: FeatureId, title: impl Into<String>) -> Result<(), ClientError> {
        self.get_mut(id)?.title = title.into();
        Ok(())
    }

    pub fn set_high_estimate(&mut self, id: FeatureId, estimate: f64) -> Result<(), ClientError> {
        self.get_mut(id)?.high_estimate = estimate;
        Ok(())
    }

    pub fn set_low_estimate(&mut self, id: FeatureId, estimate: f64) -> Result<(), ClientError> {
        self.get_mut(id)?.low_estimate = estimate;
        Ok(())
    }

    /// Attach a tagged node to a feature. Image tags also name an untitled
    /// feature after the node.
    pub fn apply_tag(
        &mut self,
        file_key: &str,
        feature_id: FeatureId,
        target: TagTarget,
        node_id: NodeId,
        node_name: &str,
        content: Option<String>,
    ) -> Result<(), ClientError> {
        let feature = self.get_mut(feature_id)?;
        let embed_url = embed_url(file_key, &node_id);

        match target {
            TagTarget::Image => {
                if feature.title.is_empty() {
                    feature.title = node_name.to_string();
                }
                feature.images.push(ImageRef { node_id, embed_url });
            }
            TagTarget::Document => {
                feature.notes.push(NoteRef {
                    node_id,
                    embed_url,
                    content: content.unwrap_or_default(),
                });
            }
        }
        Ok(())
    }

    /// Remove every note of a feature that points at `node_id`
    pub fn remove_note(&mut self, feature_id: FeatureId, node_id: &NodeId) -> Result<usize, ClientError> {
        let notes = &mut self.get_mut(feature_id)?.notes;
        let before = notes.len();
        notes.retain(|note| &note.node_id != node_id);
        Ok(before - notes.len())
    }

    /// Remove one image of a feature by position
    pub fn remove_image(&mut self, feature_id: FeatureId, index: usize) -> Result<Option<ImageRef>, ClientError> {
        let images = &mut self.get_mut(feature_id)?.images;
        if index < images.len() {
            Ok(Some(images.remove(index)))
        } else {
            Ok(None)
        }
    }

    /// Update the cached content of every note pointing at `node_id`, across
    /// all features. Returns how many notes changed.
    pub fn set_note_content(&mut self, node_id: &NodeId, content: &str) -> usize {
        let mut updated = 0;
        for note in self.features.iter_mut().flat_map(|feature| feature.notes.iter_mut()) {
            if &note.node_id == node_id {
                note.content = content.to_string();
                updated += 1;
            }
        }
        updated
    }

    /// Update one note addressed by position
    pub fn set_note_content_at(&mut self, feature_index: usize, note_index: usize, content: String) -> bool {
        match self
            .features
            .get_mut(feature_index)
            .and_then(|feature| feature.notes.get_mut(note_index))
        {
            Some(note) => {
                note.content = content;
                true
            }
            None => false,
        }
    }

    /// Every note as (feature index, note index, node id)
    pub fn note_slots(&self) -> Vec<(usize, usize, NodeId)> {
        self.features
            .iter()
            .enumerate()
            .flat_map(|(feature_index, feature)| {
                feature
                    .notes
                    .iter()
                    .enumerate()
                    .map(move |(note_index, note)| (feature_index, note_index, note.node_id.clone()))
            })
            .collect()
    }

    /// Replace the whole set, keeping the id counter ahead of every loaded id
    pub fn replace_all(&mut self, features: Vec<Feature>) {
        let after_max = features.iter().map(|feature| feature.id + 1).max().unwrap_or(0);
        self.next_id = self.next_id.max(after_max);
        self.features = features;
    }

    /// Display order: highest id first
    pub fn sorted_newest_first(&self) -> Vec<&Feature> {
        let mut sorted: Vec<&Feature> = self.features.iter().collect();
        sorted.sort_by(|a, b| b.id.cmp(&a.id));
        sorted
    }

    /// Reduce a host response into the set. Returns false for messages that
    /// carry no record changes.
    pub fn apply(&mut self, file_key: &str, message: HostMessage) -> Result<bool, ClientError> {
        match message {
            HostMessage::PostNodeTag {
                node_id,
                node_name,
                feature_id,
                target,
                content,
                ..
            } => {
                self.apply_tag(file_key, feature_id, target, node_id, &node_name, content)?;
                Ok(true)
            }
            HostMessage::FeaturesLoaded { features, .. } => {
                self.replace_all(features);
                Ok(true)
            }
            HostMessage::PostNoteContent { node_id, content, .. } => {
                Ok(self.set_note_content(&node_id, &content) > 0)
            }
            HostMessage::PostAppState { .. }
            | HostMessage::SelectionChanged { .. }
            | HostMessage::RequestFailed { .. } => Ok(false),
        }
    }
}
